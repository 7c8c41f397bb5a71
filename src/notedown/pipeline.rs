//! Compilation pipeline
//!
//! Ties the three passes together behind one entry point. The pipeline is a
//! deterministic batch transform: lexing, call-tree building, and the
//! translation walk run sequentially over one in-memory token stream, and
//! the first fatal error aborts the run with no partial output.

use crate::notedown::config::DocumentConfig;
use crate::notedown::lexing::{self, LexError};
use crate::notedown::parsing::{self, BuilderOptions, ParseError};
use crate::notedown::token::Token;
use crate::notedown::translating::{self, TranslateError, Translation};
use std::fmt;

/// Pipeline behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Error on duplicate keyword or object keys instead of letting the
    /// last write win.
    pub strict_keys: bool,
}

/// Any fatal error from one of the three passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Translate(TranslateError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(error) => write!(f, "lex error: {}", error),
            CompileError::Parse(error) => write!(f, "parse error: {}", error),
            CompileError::Translate(error) => write!(f, "translation error: {}", error),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(error: LexError) -> Self {
        CompileError::Lex(error)
    }
}

impl From<ParseError> for CompileError {
    fn from(error: ParseError) -> Self {
        CompileError::Parse(error)
    }
}

impl From<TranslateError> for CompileError {
    fn from(error: TranslateError) -> Self {
        CompileError::Translate(error)
    }
}

/// Compile notedown source into LaTeX.
pub fn compile(
    source: &str,
    config: &DocumentConfig,
    options: &CompileOptions,
) -> Result<Translation, CompileError> {
    let tokens = lexing::lex(source)?;
    let refined = parsing::build(
        tokens,
        &BuilderOptions {
            strict_keys: options.strict_keys,
        },
    )?;
    let translation = translating::translate(refined, config)?;
    Ok(translation)
}

/// The semantic token stream for a source, for inspection and debugging.
pub fn tokens(source: &str) -> Result<Vec<(Token, usize)>, LexError> {
    lexing::lex(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_small_document() {
        let config = DocumentConfig {
            title: "Problem Set 1".to_string(),
            name: "Ada Lovelace".to_string(),
            ..DocumentConfig::default()
        };
        let source = "Header() {\nProblem {\nSolve $x + 1 = 2$.\n}\n}\n";
        let translation = compile(source, &config, &CompileOptions::default()).unwrap();

        assert!(translation.latex.starts_with("\\documentclass{article}\n"));
        assert!(translation.latex.contains("\\title{Problem Set 1}"));
        assert!(translation.latex.contains("\\section*{Problem 1}"));
        assert!(translation.latex.contains("$x + 1 = 2$"));
        assert!(translation.latex.contains("\\end{document}"));
    }

    #[test]
    fn test_errors_wrap_their_stage() {
        let config = DocumentConfig::default();
        let options = CompileOptions::default();
        assert!(matches!(
            compile("\"open", &config, &options),
            Err(CompileError::Lex(_))
        ));
        assert!(matches!(
            compile("Foo(a=)", &config, &options),
            Err(CompileError::Parse(_))
        ));
        assert!(matches!(
            compile("a $b", &config, &options),
            Err(CompileError::Translate(_))
        ));
    }

    #[test]
    fn test_strict_keys_flows_through() {
        let config = DocumentConfig::default();
        let source = "Foo(a=1, a=2)";
        assert!(compile(source, &config, &CompileOptions::default()).is_ok());
        assert!(matches!(
            compile(source, &config, &CompileOptions { strict_keys: true }),
            Err(CompileError::Parse(ParseError::DuplicateKey { .. }))
        ));
    }

    #[test]
    fn test_tokens_entry_matches_lexer() {
        let stream = tokens("a b").unwrap();
        assert_eq!(stream.len(), 2);
    }
}
