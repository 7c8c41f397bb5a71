//! The translation walk
//!
//! One left-to-right pass over the refined token stream. The walker owns the
//! two coupled stacks: the context stack (bottomed at `Normal`, never empty)
//! that decides how literal text is emitted, and the scope stack holding the
//! bound handler of every open closure. Tokens are immutable value records;
//! all mutation lives in the walker's own state.

use crate::notedown::config::DocumentConfig;
use crate::notedown::diagnostics::Warning;
use crate::notedown::token::Token;
use crate::notedown::translating::context::ParseContext;
use crate::notedown::translating::handlers::{FnMapping, RunState};
use std::fmt;

/// Errors that can occur during the translation walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// A structural token with no business in running text (an object or
    /// list literal outside a call, a stray delimiter).
    UnexpectedToken { found: String, line: usize },
    /// A closure body with no call in front of it.
    ClosureWithoutCall { line: usize },
    /// A closure end with nothing on the scope stack.
    UnmatchedClosureEnd { line: usize },
    /// Math mode left open at a closure boundary or end of input.
    UnbalancedMath { line: usize },
    /// A closure still open at end of input.
    UnclosedClosure { name: String, line: usize },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::UnexpectedToken { found, line } => {
                write!(f, "unexpected {} outside a call (line {})", found, line)
            }
            TranslateError::ClosureWithoutCall { line } => {
                write!(f, "closure body with no preceding call (line {})", line)
            }
            TranslateError::UnmatchedClosureEnd { line } => {
                write!(f, "`}}` with no open closure (line {})", line)
            }
            TranslateError::UnbalancedMath { line } => {
                write!(f, "math mode opened on line {} is never closed", line)
            }
            TranslateError::UnclosedClosure { name, line } => {
                write!(
                    f,
                    "closure of `{}` opened on line {} is never closed",
                    name, line
                )
            }
        }
    }
}

impl std::error::Error for TranslateError {}

/// The result of one translation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub latex: String,
    pub warnings: Vec<Warning>,
}

/// Translate a refined token stream into LaTeX text.
///
/// Numbering state is scoped to this call; repeated runs over the same
/// stream produce identical output.
pub fn translate(
    tokens: Vec<(Token, usize)>,
    config: &DocumentConfig,
) -> Result<Translation, TranslateError> {
    Translator::new(config).run(tokens)
}

struct Translator<'a> {
    context_stack: Vec<ParseContext>,
    scope_stack: Vec<FnMapping>,
    run_state: RunState<'a>,
    warnings: Vec<Warning>,
    out: String,
    /// Handler of the call just emitted, waiting to see whether a closure
    /// follows it.
    pending: Option<FnMapping>,
    /// Whether the next run of text needs a separating space.
    needs_space: bool,
    /// Line of the currently open math delimiter, for error reporting.
    math_open_line: usize,
}

impl<'a> Translator<'a> {
    fn new(config: &'a DocumentConfig) -> Self {
        Translator {
            context_stack: vec![ParseContext::Normal],
            scope_stack: Vec::new(),
            run_state: RunState::new(config),
            warnings: Vec::new(),
            out: String::new(),
            pending: None,
            needs_space: false,
            math_open_line: 1,
        }
    }

    fn run(mut self, tokens: Vec<(Token, usize)>) -> Result<Translation, TranslateError> {
        for (token, line) in tokens {
            // Only an immediately following closure consumes the pending
            // handler; any other successor makes the call inline-only.
            if !matches!(token, Token::StartClosure) {
                self.drop_pending();
            }
            match token {
                Token::Call(node) => {
                    let handler = FnMapping::resolve(node, &mut self.warnings);
                    let text = handler.begin(&mut self.run_state);
                    self.push_block(&text);
                    self.pending = Some(handler);
                }
                Token::StartClosure => {
                    let handler = self
                        .pending
                        .take()
                        .ok_or(TranslateError::ClosureWithoutCall { line })?;
                    let body = match handler.body_context() {
                        ParseContext::InheritParent => self.current_context(),
                        fixed => fixed,
                    };
                    self.context_stack.push(body);
                    self.scope_stack.push(handler);
                }
                Token::EndClosure => {
                    let handler = self
                        .scope_stack
                        .pop()
                        .ok_or(TranslateError::UnmatchedClosureEnd { line })?;
                    if self.current_context() == ParseContext::Math
                        && handler.body_context() != ParseContext::Math
                    {
                        return Err(TranslateError::UnbalancedMath {
                            line: self.math_open_line,
                        });
                    }
                    self.context_stack.pop();
                    let text = handler.end();
                    self.push_block(&text);
                }
                Token::Word(text) | Token::QuotedString(text) => self.push_text(&text),
                Token::Comment(text) => {
                    self.out.push('%');
                    self.out.push_str(&text);
                    self.needs_space = false;
                }
                Token::MathDelimiter { double } => {
                    let delimiter = if double { "$$" } else { "$" };
                    if self.current_context() == ParseContext::Math {
                        self.context_stack.pop();
                        self.out.push_str(delimiter);
                        self.needs_space = true;
                    } else {
                        if self.needs_space {
                            self.out.push(' ');
                        }
                        self.context_stack.push(ParseContext::Math);
                        self.math_open_line = line;
                        self.out.push_str(delimiter);
                        self.needs_space = false;
                    }
                }
                Token::NewLine { eats_break } => {
                    if eats_break {
                        self.out.push('\n');
                    } else {
                        self.out.push_str("\\\\\n");
                    }
                    self.needs_space = false;
                }
                Token::LineJoin => {}
                other => {
                    return Err(TranslateError::UnexpectedToken {
                        found: other.describe(),
                        line,
                    })
                }
            }
        }
        self.drop_pending();

        if let Some(handler) = self.scope_stack.last() {
            return Err(TranslateError::UnclosedClosure {
                name: handler.name().to_string(),
                line: handler.line(),
            });
        }
        if self
            .context_stack
            .iter()
            .any(|context| *context == ParseContext::Math)
        {
            return Err(TranslateError::UnbalancedMath {
                line: self.math_open_line,
            });
        }
        Ok(Translation {
            latex: self.out,
            warnings: self.warnings,
        })
    }

    fn current_context(&self) -> ParseContext {
        self.context_stack
            .last()
            .copied()
            .unwrap_or(ParseContext::Normal)
    }

    /// Emit literal text, re-inserting the single space that separated it
    /// from the preceding word. Identity otherwise, in both substitution
    /// modes; context-specific rendering is a handler concern.
    fn push_text(&mut self, text: &str) {
        if self.needs_space {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.needs_space = true;
    }

    /// Emit handler begin/end text.
    fn push_block(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.needs_space && !text.starts_with(['\n', '}']) {
            self.out.push(' ');
        }
        self.out.push_str(text);
        // An open brace or a block's own newline wants the body flush
        // against it; anything else reads as inline output.
        self.needs_space = !text.ends_with(['\n', '{', '[']);
    }

    /// A call whose handler expected a block but never got one still emits
    /// its `begin()`; flag it so the author notices the missing braces.
    fn drop_pending(&mut self) {
        if let Some(handler) = self.pending.take() {
            if handler.expects_block() {
                self.warnings.push(Warning::new(
                    handler.line(),
                    format!("directive `{}` expects a block body", handler.name()),
                ));
            }
        }
    }
}
