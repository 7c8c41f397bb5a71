//! Base tokenization implementation for the notedown lexer
//!
//! This module provides the raw tokenization using the logos lexer library.
//! This is the entry point where source strings become token streams.
//!
//! This is NOT the markup lexer - the scanner transformation operates on the
//! raw token stream this produces and emits the semantic tokens. Callers
//! should go through [lex](crate::notedown::lexing::lex) rather than calling
//! this directly.

use crate::notedown::lexing::tokens::RawToken;
use logos::Logos;

/// Tokenize source text into raw character-class tokens with their spans.
///
/// The raw grammar is total: every character of the input belongs to exactly
/// one token, so the scanner can reconstruct any source slice it needs.
pub fn tokenize(source: &str) -> Vec<(RawToken, logos::Span)> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}
