//! Raw token definitions for the notedown lexer
//!
//! This module defines the character-class tokens produced by the logos
//! lexer. Raw tokens carry no context: the same `{` lexes identically
//! whether it will become a closure brace, an object brace, or a literal
//! character inside a quoted string. The scanner resolves that later from
//! its state stack and the token's source slice.

use logos::Logos;

/// All raw character-class tokens.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    // An escape pair: backslash plus one non-newline character. Matching the
    // pair as a single token keeps escaped delimiters out of every other
    // rule.
    #[regex(r"\\[^\n]")]
    Escape,

    // A backslash with nothing escapable after it (end of line or input).
    #[token("\\")]
    Backslash,

    #[token("%")]
    Percent,

    // Two adjacent dollars are one token, so `$$` can never lex as two
    // singles.
    #[token("$$")]
    DoubleDollar,
    #[token("$")]
    Dollar,

    #[token("\"")]
    Quote,

    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,

    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,

    #[token("\n")]
    Newline,

    // Horizontal whitespace only; newlines are their own token.
    #[regex(r"[ \t\r]+")]
    Whitespace,

    // Catch-all for runs of every remaining character.
    #[regex(r#"[^ \t\r\n\\%$"(){}\[\],=:]+"#)]
    Text,
}
