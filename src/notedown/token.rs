//! Core token types shared across the lexer, call-tree builder, and translator.
//!
//!     Notedown opts for handling most of the grammar's complexity in the
//!     lexing stage so that the later passes stay simple. The lexer already
//!     resolves every context-dependent character (the closure-vs-object
//!     brace, delimiters that only count inside argument lists, escapes), so
//!     the token vocabulary below is fully unambiguous: the builder and the
//!     translator never have to look at the source text again.
//!
//! Token Layers
//!
//!     Raw Tokens:
//!         Character-class tokens produced by the logos lexer. They never
//!         leave the lexing module. See [tokens](crate::notedown::lexing::tokens).
//!
//!     Semantic Tokens:
//!         The [Token] enum below, paired with the 1-based source line in
//!         `Vec<(Token, usize)>` streams. Produced by the scanner, consumed
//!         by the builder and the translator.
//!
//!     Synthetic Tokens:
//!         `StartCall`/`EndCall` pairs the scanner fabricates for implicit
//!         zero-argument calls (`Box { ... }`), so that the builder sees one
//!         uniform call grammar and never special-cases the implicit form.
//!
//!     Refined Tokens:
//!         After call-tree building, each `FunctionName` plus its bracketed
//!         argument run collapses into a single `Call` token carrying a
//!         [CallNode]; all other tokens pass through unchanged.

use std::collections::HashMap;

/// A single semantic token.
///
/// Tokens are immutable value records; streams pair them with the 1-based
/// source line they started on.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Token {
    /// A run of bare text between delimiters.
    Word(String),
    /// The contents of a `"..."` literal, quotes stripped, escapes folded.
    QuotedString(String),
    /// The text of a `%` comment, marker stripped, up to the newline.
    Comment(String),
    /// End of a source line. `eats_break` is true when the preceding token
    /// already ends the line (comment, line join, closure brace), in which
    /// case the translator emits no forced break for it.
    NewLine { eats_break: bool },
    /// `$` or `$$`. Two adjacent unescaped dollars always lex as one double
    /// delimiter, never as two singles.
    MathDelimiter { double: bool },
    /// `(` opening an argument list.
    StartCall,
    /// `)` closing an argument list.
    EndCall,
    /// `{` opening a closure body.
    StartClosure,
    /// `}` closing a closure body.
    EndClosure,
    /// `{` opening an object literal.
    StartObject,
    /// `}` closing an object literal.
    EndObject,
    /// `[` opening a list literal.
    StartList,
    /// `]` closing a list literal.
    EndList,
    /// `,` between arguments, list elements, or object entries.
    ArgDelimiter,
    /// `=` between a keyword and its value in an argument list.
    KeywordAssign,
    /// `:` between a key and its value in an object literal.
    KeyValueDelimiter,
    /// `\\` - suppresses the forced break of the newline that follows it.
    LineJoin,
    /// A name directly followed by `(`, not yet resolved to a handler.
    FunctionName(String),
    /// A fully built call. Only present after call-tree building.
    Call(CallNode),
}

impl Token {
    /// True for tokens after which a newline needs no forced break.
    pub fn ends_line(&self) -> bool {
        matches!(
            self,
            Token::Comment(_) | Token::LineJoin | Token::StartClosure | Token::EndClosure
        )
    }

    /// True for the markers that open or close a bracketed structure.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Token::StartCall
                | Token::EndCall
                | Token::StartClosure
                | Token::EndClosure
                | Token::StartObject
                | Token::EndObject
                | Token::StartList
                | Token::EndList
        )
    }

    /// Short lowercase description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("word `{}`", w),
            Token::QuotedString(_) => "quoted string".to_string(),
            Token::Comment(_) => "comment".to_string(),
            Token::NewLine { .. } => "newline".to_string(),
            Token::MathDelimiter { double: false } => "`$`".to_string(),
            Token::MathDelimiter { double: true } => "`$$`".to_string(),
            Token::StartCall => "`(`".to_string(),
            Token::EndCall => "`)`".to_string(),
            Token::StartClosure => "`{` (closure)".to_string(),
            Token::EndClosure => "`}` (closure)".to_string(),
            Token::StartObject => "`{` (object)".to_string(),
            Token::EndObject => "`}` (object)".to_string(),
            Token::StartList => "`[`".to_string(),
            Token::EndList => "`]`".to_string(),
            Token::ArgDelimiter => "`,`".to_string(),
            Token::KeywordAssign => "`=`".to_string(),
            Token::KeyValueDelimiter => "`:`".to_string(),
            Token::LineJoin => "line join".to_string(),
            Token::FunctionName(name) => format!("call name `{}`", name),
            Token::Call(node) => format!("call `{}`", node.name),
        }
    }
}

/// An argument or keyword-argument payload after call-tree building.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Value {
    Word(String),
    QuotedString(String),
    /// Ordered `[a, b, c]` literal.
    List(Vec<Value>),
    /// `{key: value}` literal. Keys are unique; on duplicates the last
    /// write wins unless the builder runs in strict mode.
    Object(HashMap<String, Value>),
    /// A nested call used as an argument.
    Call(CallNode),
}

impl Value {
    /// The text of a `Word` or `QuotedString` value; `None` otherwise.
    ///
    /// Keyword and object keys must come from one of these two shapes.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Word(text) | Value::QuotedString(text) => Some(text),
            _ => None,
        }
    }
}

/// A resolved call: name, positional arguments in source order, and keyword
/// arguments (insertion order irrelevant).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CallNode {
    pub name: String,
    pub args: Vec<Value>,
    pub kwargs: HashMap<String, Value>,
    /// Line of the call name in the source.
    pub line: usize,
}

impl CallNode {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        CallNode {
            name: name.into(),
            args: Vec::new(),
            kwargs: HashMap::new(),
            line,
        }
    }

    /// Keyword argument lookup.
    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ends_line_predicate() {
        assert!(Token::Comment("c".to_string()).ends_line());
        assert!(Token::LineJoin.ends_line());
        assert!(Token::StartClosure.ends_line());
        assert!(Token::EndClosure.ends_line());
        assert!(!Token::Word("w".to_string()).ends_line());
        assert!(!Token::NewLine { eats_break: false }.ends_line());
    }

    #[test]
    fn test_value_as_key() {
        assert_eq!(Value::Word("a".to_string()).as_key(), Some("a"));
        assert_eq!(Value::QuotedString("b".to_string()).as_key(), Some("b"));
        assert_eq!(Value::List(vec![]).as_key(), None);
    }

    #[test]
    fn test_call_node_kwarg_lookup() {
        let mut node = CallNode::new("Header", 1);
        node.kwargs
            .insert("title".to_string(), Value::Word("hi".to_string()));
        assert_eq!(node.kwarg("title"), Some(&Value::Word("hi".to_string())));
        assert_eq!(node.kwarg("missing"), None);
    }
}
