//! Call-tree builder for the notedown format
//!
//! The lexer leaves call argument runs flat: a `FunctionName` followed by
//! `StartCall`, the argument tokens, and `EndCall`. This module folds each
//! such run (recursively, since calls nest inside argument lists) into a
//! single `Call` token carrying a structured [CallNode], and enforces the
//! argument grammar: string-only keys, one value between delimiters, and a
//! properly terminated list. Every other token passes through unchanged, so
//! the refined stream is the same length or shorter.
//!
//! [CallNode]: crate::notedown::token::CallNode

pub mod builder;
pub mod common;

pub use builder::{build, BuilderOptions};
pub use common::ParseError;
