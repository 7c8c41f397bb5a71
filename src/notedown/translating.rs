//! Translator from refined tokens to LaTeX
//!
//! The final pass. A single left-to-right walk over the refined token
//! stream resolves each call to a handler, keeps two coupled LIFO stacks
//! (the parse-context stack and the open-closure scope stack), and writes
//! the LaTeX output:
//!
//! - [handlers] maps call names to handler kinds and produces the
//!   `begin()`/`end()` text for each call.
//! - [translator] owns the walk, the stacks, math-mode toggling, and
//!   line-break normalization.
//! - [context] defines the parse contexts the stack is made of.

pub mod context;
pub mod handlers;
pub mod translator;

pub use context::ParseContext;
pub use handlers::FnMapping;
pub use translator::{translate, TranslateError, Translation};
