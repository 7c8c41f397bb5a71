//! Context-sensitive scanner for the notedown lexer
//!
//! This transformation walks the raw token stream with an explicit stack of
//! scanner states and emits the semantic token stream. All context-dependent
//! decisions happen here: which characters are delimiters, whether `{` opens
//! a closure or an object literal, how escapes fold, and where each source
//! line begins.
//!
//! State Stack
//!
//!     The scanner state is a stack, not a flat enum, because quoted
//!     strings, lists, and objects nest recursively inside argument lists
//!     and inside each other; popping a state must restore the exact
//!     enclosing one. Closure bodies push their own state so that a `}` can
//!     always be matched to the innermost open structure.
//!
//! Word Accumulator
//!
//!     Characters of the current bare word collect in a mutable buffer; any
//!     delimiter (whitespace, structural character, newline) flushes the
//!     buffer into a `Word` token before the delimiter itself is processed.
//!     A `(` arriving while the buffer is non-empty turns the buffered word
//!     into a `FunctionName` instead, which is what distinguishes `Name(`
//!     from `Name (`.

use crate::notedown::lexing::tokens::RawToken;
use crate::notedown::token::Token;
use std::fmt;

/// Errors that can occur during scanning. Every variant carries the 1-based
/// source line; unterminated structures report the line they started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnterminatedString { line: usize },
    UnterminatedCall { line: usize },
    UnterminatedList { line: usize },
    UnterminatedObject { line: usize },
    UnterminatedClosure { line: usize },
    InvalidDelimiter { line: usize, found: char },
    ClosureAtStart { line: usize },
    UnmatchedBrace { line: usize },
}

impl LexError {
    /// The 1-based source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedString { line }
            | LexError::UnterminatedCall { line }
            | LexError::UnterminatedList { line }
            | LexError::UnterminatedObject { line }
            | LexError::UnterminatedClosure { line }
            | LexError::InvalidDelimiter { line, .. }
            | LexError::ClosureAtStart { line }
            | LexError::UnmatchedBrace { line } => *line,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedString { line } => {
                write!(f, "unterminated quoted string starting on line {}", line)
            }
            LexError::UnterminatedCall { line } => {
                write!(f, "unterminated argument list starting on line {}", line)
            }
            LexError::UnterminatedList { line } => {
                write!(f, "unterminated list literal starting on line {}", line)
            }
            LexError::UnterminatedObject { line } => {
                write!(f, "unterminated object literal starting on line {}", line)
            }
            LexError::UnterminatedClosure { line } => {
                write!(f, "unterminated closure starting on line {}", line)
            }
            LexError::InvalidDelimiter { line, found } => {
                write!(
                    f,
                    "invalid delimiter `{}` for the enclosing context on line {}",
                    found, line
                )
            }
            LexError::ClosureAtStart { line } => {
                write!(f, "cannot start document with closure (line {})", line)
            }
            LexError::UnmatchedBrace { line } => write!(f, "unmatched `}}` on line {}", line),
        }
    }
}

impl std::error::Error for LexError {}

/// The scanner's sub-states. `Normal` is the document root; `InClosure` is
/// the body of an open closure and behaves like `Normal` except that `}`
/// closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InClosure,
    InCallArgs,
    InString,
    InList,
    InObject,
    InComment,
}

struct Scanner {
    /// Active sub-states, innermost last, paired with their start line.
    /// Never empty; the bottom entry is `Normal`.
    states: Vec<(ScanState, usize)>,
    out: Vec<(Token, usize)>,
    buffer: String,
    line: usize,
}

/// Transform the raw token stream into semantic tokens.
pub fn scan(source: &str, raw: &[(RawToken, logos::Span)]) -> Result<Vec<(Token, usize)>, LexError> {
    let mut scanner = Scanner::new();
    for (token, span) in raw {
        scanner.step(*token, &source[span.clone()])?;
    }
    scanner.finish()
}

impl Scanner {
    fn new() -> Self {
        Scanner {
            states: vec![(ScanState::Normal, 1)],
            out: Vec::new(),
            buffer: String::new(),
            line: 1,
        }
    }

    fn state(&self) -> ScanState {
        self.states.last().map(|(s, _)| *s).unwrap_or(ScanState::Normal)
    }

    fn push_state(&mut self, state: ScanState) {
        self.states.push((state, self.line));
    }

    fn pop_state(&mut self) {
        self.states.pop();
    }

    fn emit(&mut self, token: Token) {
        self.out.push((token, self.line));
    }

    /// Flush the word accumulator into a `Word` token, if non-empty.
    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let word = std::mem::take(&mut self.buffer);
            self.emit(Token::Word(word));
        }
    }

    fn step(&mut self, token: RawToken, slice: &str) -> Result<(), LexError> {
        match self.state() {
            ScanState::InComment => self.step_comment(token, slice),
            ScanState::InString => self.step_string(token, slice),
            _ => self.step_content(token, slice),
        }
    }

    /// Comment state: everything up to the newline is comment text.
    fn step_comment(&mut self, token: RawToken, slice: &str) -> Result<(), LexError> {
        if token == RawToken::Newline {
            let text = std::mem::take(&mut self.buffer);
            self.emit(Token::Comment(text));
            self.pop_state();
            self.emit_newline();
        } else {
            self.buffer.push_str(slice);
        }
        Ok(())
    }

    /// Quoted-string state: slices accumulate verbatim; only the escape
    /// table for `%`, `$`, `{`, `}` applies.
    fn step_string(&mut self, token: RawToken, slice: &str) -> Result<(), LexError> {
        match token {
            RawToken::Quote => {
                let text = std::mem::take(&mut self.buffer);
                let start = self.states.last().map(|(_, l)| *l).unwrap_or(self.line);
                self.out.push((Token::QuotedString(text), start));
                self.pop_state();
            }
            RawToken::Escape => match &slice[1..] {
                "%" | "$" | "{" | "}" => self.buffer.push_str(&slice[1..]),
                _ => self.buffer.push_str(slice),
            },
            RawToken::Newline => {
                self.buffer.push('\n');
                self.line += 1;
            }
            _ => self.buffer.push_str(slice),
        }
        Ok(())
    }

    /// All remaining states: document content, closure bodies, and the three
    /// bracketed argument contexts.
    fn step_content(&mut self, token: RawToken, slice: &str) -> Result<(), LexError> {
        let state = self.state();
        match token {
            RawToken::Text => self.buffer.push_str(slice),
            RawToken::Whitespace => self.flush(),
            RawToken::Escape => match &slice[1..] {
                "\\" => {
                    self.flush();
                    self.emit(Token::LineJoin);
                }
                "%" | "$" | "{" | "}" => self.buffer.push_str(&slice[1..]),
                _ => self.buffer.push_str(slice),
            },
            RawToken::Backslash => self.buffer.push('\\'),
            RawToken::Percent => {
                self.flush();
                self.push_state(ScanState::InComment);
            }
            RawToken::Dollar => {
                self.flush();
                self.emit(Token::MathDelimiter { double: false });
            }
            RawToken::DoubleDollar => {
                self.flush();
                self.emit(Token::MathDelimiter { double: true });
            }
            RawToken::Quote => {
                self.flush();
                self.push_state(ScanState::InString);
            }
            RawToken::OpenParen => {
                if self.buffer.is_empty() {
                    // `Name (` keeps the paren literal; only `Name(` calls.
                    self.buffer.push('(');
                } else {
                    let name = std::mem::take(&mut self.buffer);
                    self.emit(Token::FunctionName(name));
                    self.emit(Token::StartCall);
                    self.push_state(ScanState::InCallArgs);
                }
            }
            RawToken::CloseParen => match state {
                ScanState::InCallArgs => {
                    self.flush();
                    self.emit(Token::EndCall);
                    self.pop_state();
                }
                ScanState::Normal | ScanState::InClosure => self.buffer.push(')'),
                _ => {
                    return Err(LexError::InvalidDelimiter {
                        line: self.line,
                        found: ')',
                    })
                }
            },
            RawToken::OpenBracket => {
                self.flush();
                self.emit(Token::StartList);
                self.push_state(ScanState::InList);
            }
            RawToken::CloseBracket => match state {
                ScanState::InList => {
                    self.flush();
                    self.emit(Token::EndList);
                    self.pop_state();
                }
                ScanState::Normal | ScanState::InClosure => self.buffer.push(']'),
                _ => {
                    return Err(LexError::InvalidDelimiter {
                        line: self.line,
                        found: ']',
                    })
                }
            },
            RawToken::Comma => match state {
                ScanState::InCallArgs | ScanState::InList | ScanState::InObject => {
                    self.flush();
                    self.emit(Token::ArgDelimiter);
                }
                _ => self.buffer.push(','),
            },
            RawToken::Equals => match state {
                ScanState::InCallArgs => {
                    self.flush();
                    self.emit(Token::KeywordAssign);
                }
                ScanState::InList | ScanState::InObject => {
                    return Err(LexError::InvalidDelimiter {
                        line: self.line,
                        found: '=',
                    })
                }
                _ => self.buffer.push('='),
            },
            RawToken::Colon => match state {
                ScanState::InObject => {
                    self.flush();
                    self.emit(Token::KeyValueDelimiter);
                }
                ScanState::InCallArgs | ScanState::InList => {
                    return Err(LexError::InvalidDelimiter {
                        line: self.line,
                        found: ':',
                    })
                }
                _ => self.buffer.push(':'),
            },
            RawToken::OpenBrace => self.open_brace()?,
            RawToken::CloseBrace => match state {
                ScanState::InObject => {
                    self.flush();
                    self.emit(Token::EndObject);
                    self.pop_state();
                }
                ScanState::InClosure => {
                    self.flush();
                    self.emit(Token::EndClosure);
                    self.pop_state();
                }
                ScanState::Normal => return Err(LexError::UnmatchedBrace { line: self.line }),
                _ => {
                    return Err(LexError::InvalidDelimiter {
                        line: self.line,
                        found: '}',
                    })
                }
            },
            RawToken::Newline => {
                self.flush();
                self.emit_newline();
            }
        }
        Ok(())
    }

    /// Resolve the `{` ambiguity.
    ///
    /// A buffered word, a just-closed argument list, or a just-emitted bare
    /// word all make `{` open a closure (the word cases become implicit
    /// zero-argument calls, with a synthetic `StartCall`/`EndCall` pair so
    /// the builder sees one uniform call grammar). Anything else opens an
    /// object literal, except at the very start of the document.
    fn open_brace(&mut self) -> Result<(), LexError> {
        if !self.buffer.is_empty() {
            let name = std::mem::take(&mut self.buffer);
            self.emit(Token::FunctionName(name));
            self.emit(Token::StartCall);
            self.emit(Token::EndCall);
            self.emit(Token::StartClosure);
            self.push_state(ScanState::InClosure);
            return Ok(());
        }
        match self.out.last() {
            Some((Token::EndCall, _)) => {
                self.emit(Token::StartClosure);
                self.push_state(ScanState::InClosure);
            }
            Some((Token::Word(_), _)) => {
                // Promote the word to an implicit zero-argument call.
                let (word, word_line) = match self.out.pop() {
                    Some((Token::Word(w), l)) => (w, l),
                    _ => unreachable!("guarded by the match above"),
                };
                self.out.push((Token::FunctionName(word), word_line));
                self.emit(Token::StartCall);
                self.emit(Token::EndCall);
                self.emit(Token::StartClosure);
                self.push_state(ScanState::InClosure);
            }
            None => return Err(LexError::ClosureAtStart { line: self.line }),
            Some(_) => {
                self.emit(Token::StartObject);
                self.push_state(ScanState::InObject);
            }
        }
        Ok(())
    }

    /// Emit the `NewLine` token and advance the line counter. The token
    /// carries the one fact its consumer needs: whether the preceding token
    /// already ends the line.
    fn emit_newline(&mut self) {
        let eats_break = self
            .out
            .last()
            .map(|(token, _)| token.ends_line())
            .unwrap_or(true);
        self.emit(Token::NewLine { eats_break });
        self.line += 1;
    }

    fn finish(mut self) -> Result<Vec<(Token, usize)>, LexError> {
        // A comment at end of input closes without its newline.
        if self.state() == ScanState::InComment {
            let text = std::mem::take(&mut self.buffer);
            self.emit(Token::Comment(text));
            self.pop_state();
        }
        match self.states.last() {
            Some((ScanState::InString, line)) => {
                return Err(LexError::UnterminatedString { line: *line })
            }
            Some((ScanState::InCallArgs, line)) => {
                return Err(LexError::UnterminatedCall { line: *line })
            }
            Some((ScanState::InList, line)) => {
                return Err(LexError::UnterminatedList { line: *line })
            }
            Some((ScanState::InObject, line)) => {
                return Err(LexError::UnterminatedObject { line: *line })
            }
            Some((ScanState::InClosure, line)) => {
                return Err(LexError::UnterminatedClosure { line: *line })
            }
            _ => {}
        }
        self.flush();
        Ok(self.out)
    }
}
