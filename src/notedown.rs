//! Main module for the notedown library
//!
//! The compiler is a chain of three passes over one in-memory token stream:
//!
//! 1. [lexing] - source text to semantic tokens (context-sensitive)
//! 2. [parsing] - call argument runs folded into call nodes
//! 3. [translating] - a single walk that emits the LaTeX output
//!
//! [pipeline] ties the passes together, [config] holds the document header
//! fields consumed by the `Header` directive, and [diagnostics] carries the
//! non-fatal warnings surfaced next to the output.

pub mod config;
pub mod diagnostics;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod token;
pub mod translating;
