//! # notedown
//!
//! A compiler for the notedown markup format.
//!
//! Notedown is a lightweight markup language for typesetting problem sets and
//! course notes: plain text interleaved with call directives, nested
//! list/object argument literals, and inline `$...$` math. The library
//! translates notedown source into LaTeX text in three passes: lexing,
//! call-tree building, and translation. See the [pipeline
//! module](notedown::pipeline) for the top-level entry points.

pub mod notedown;
