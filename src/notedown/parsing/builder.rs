//! Builder from flat tokens to call trees
//!
//! A single left-to-right walk. Tokens that are not part of a call pass
//! through untouched; each `FunctionName` consumes its argument run and
//! collapses into one `Call` token. Argument lists, list literals, and
//! object literals share the same value/delimiter loop shape, each bounded
//! by its own terminator.
//!
//! Newlines and comments are insignificant anywhere inside an argument run,
//! at value positions and delimiter positions alike; conventional multi-line
//! argument lists depend on both.

use crate::notedown::parsing::common::ParseError;
use crate::notedown::token::{CallNode, Token, Value};
use std::collections::HashMap;

/// Builder behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderOptions {
    /// Error on duplicate keyword or object keys instead of letting the
    /// last write win. Off by default.
    pub strict_keys: bool,
}

/// Fold call argument runs into `Call` tokens.
///
/// The refined stream preserves the order and line numbers of everything
/// outside argument runs.
pub fn build(
    tokens: Vec<(Token, usize)>,
    options: &BuilderOptions,
) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut cursor = Cursor::new(tokens);
    let mut out = Vec::new();
    while let Some((token, line)) = cursor.next() {
        match token {
            Token::FunctionName(name) => {
                let node = parse_call(&mut cursor, name, line, options)?;
                out.push((Token::Call(node), line));
            }
            other => out.push((other, line)),
        }
    }
    Ok(out)
}

struct Cursor {
    iter: std::iter::Peekable<std::vec::IntoIter<(Token, usize)>>,
    /// Line of the most recently consumed token, for end-of-input errors.
    line: usize,
}

impl Cursor {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Cursor {
            iter: tokens.into_iter().peekable(),
            line: 1,
        }
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.iter.next();
        if let Some((_, line)) = &item {
            self.line = *line;
        }
        item
    }

    fn peek(&mut self) -> Option<&Token> {
        self.iter.peek().map(|(token, _)| token)
    }

    /// Skip tokens with no grammatical weight inside argument runs.
    fn skip_insignificant(&mut self) {
        while matches!(
            self.peek(),
            Some(Token::Comment(_)) | Some(Token::NewLine { .. })
        ) {
            self.next();
        }
    }
}

fn parse_call(
    cursor: &mut Cursor,
    name: String,
    line: usize,
    options: &BuilderOptions,
) -> Result<CallNode, ParseError> {
    match cursor.next() {
        Some((Token::StartCall, _)) => {}
        _ => return Err(ParseError::MissingArgList { name, line }),
    }

    let mut node = CallNode::new(name, line);
    loop {
        cursor.skip_insignificant();
        if matches!(cursor.peek(), Some(Token::EndCall)) {
            cursor.next();
            return Ok(node);
        }

        let value = parse_value(cursor, &node.name, options)?;
        cursor.skip_insignificant();
        match cursor.next() {
            Some((Token::ArgDelimiter, _)) => node.args.push(value),
            Some((Token::EndCall, _)) => {
                node.args.push(value);
                return Ok(node);
            }
            Some((Token::KeywordAssign, assign_line)) => {
                let key = match value.as_key() {
                    Some(key) => key.to_string(),
                    None => {
                        return Err(ParseError::NonStringKey {
                            line: assign_line,
                            call: Some(node.name.clone()),
                        })
                    }
                };
                cursor.skip_insignificant();
                if matches!(
                    cursor.peek(),
                    Some(Token::ArgDelimiter) | Some(Token::EndCall) | Some(Token::KeywordAssign)
                ) {
                    return Err(ParseError::MissingValue {
                        key,
                        line: assign_line,
                        call: node.name.clone(),
                    });
                }
                let keyword_value = parse_value(cursor, &node.name, options)?;
                insert_key(
                    &mut node.kwargs,
                    key,
                    keyword_value,
                    assign_line,
                    Some(&node.name),
                    options,
                )?;
                cursor.skip_insignificant();
                match cursor.next() {
                    Some((Token::ArgDelimiter, _)) => {}
                    Some((Token::EndCall, _)) => return Ok(node),
                    Some((token, token_line)) => {
                        return Err(ParseError::UnexpectedToken {
                            found: token.describe(),
                            line: token_line,
                            call: Some(node.name.clone()),
                        })
                    }
                    None => {
                        return Err(ParseError::UnexpectedEnd {
                            name: node.name.clone(),
                            line: cursor.line,
                        })
                    }
                }
            }
            Some((token, token_line)) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    line: token_line,
                    call: Some(node.name.clone()),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    name: node.name.clone(),
                    line: cursor.line,
                })
            }
        }
    }
}

/// Parse one argument value, recursing into nested calls and literals.
fn parse_value(
    cursor: &mut Cursor,
    call: &str,
    options: &BuilderOptions,
) -> Result<Value, ParseError> {
    match cursor.next() {
        Some((Token::Word(word), _)) => Ok(Value::Word(word)),
        Some((Token::QuotedString(text), _)) => Ok(Value::QuotedString(text)),
        Some((Token::FunctionName(name), line)) => {
            Ok(Value::Call(parse_call(cursor, name, line, options)?))
        }
        Some((Token::StartList, _)) => parse_list(cursor, call, options),
        Some((Token::StartObject, _)) => parse_object(cursor, call, options),
        Some((token, line)) => Err(ParseError::UnexpectedToken {
            found: token.describe(),
            line,
            call: Some(call.to_string()),
        }),
        None => Err(ParseError::UnexpectedEnd {
            name: call.to_string(),
            line: cursor.line,
        }),
    }
}

fn parse_list(
    cursor: &mut Cursor,
    call: &str,
    options: &BuilderOptions,
) -> Result<Value, ParseError> {
    let mut items = Vec::new();
    loop {
        cursor.skip_insignificant();
        if matches!(cursor.peek(), Some(Token::EndList)) {
            cursor.next();
            return Ok(Value::List(items));
        }

        items.push(parse_value(cursor, call, options)?);
        cursor.skip_insignificant();
        match cursor.next() {
            Some((Token::ArgDelimiter, _)) => {}
            Some((Token::EndList, _)) => return Ok(Value::List(items)),
            Some((token, line)) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    line,
                    call: Some(call.to_string()),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    name: call.to_string(),
                    line: cursor.line,
                })
            }
        }
    }
}

fn parse_object(
    cursor: &mut Cursor,
    call: &str,
    options: &BuilderOptions,
) -> Result<Value, ParseError> {
    let mut entries = HashMap::new();
    loop {
        cursor.skip_insignificant();
        if matches!(cursor.peek(), Some(Token::EndObject)) {
            cursor.next();
            return Ok(Value::Object(entries));
        }

        let (key, key_line) = match cursor.next() {
            Some((Token::Word(key), line)) | Some((Token::QuotedString(key), line)) => (key, line),
            Some((_, line)) => {
                return Err(ParseError::NonStringKey {
                    line,
                    call: Some(call.to_string()),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    name: call.to_string(),
                    line: cursor.line,
                })
            }
        };
        cursor.skip_insignificant();
        match cursor.next() {
            Some((Token::KeyValueDelimiter, _)) => {}
            Some((token, line)) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    line,
                    call: Some(call.to_string()),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    name: call.to_string(),
                    line: cursor.line,
                })
            }
        }
        cursor.skip_insignificant();
        let value = parse_value(cursor, call, options)?;
        insert_key(&mut entries, key, value, key_line, Some(call), options)?;
        cursor.skip_insignificant();
        match cursor.next() {
            Some((Token::ArgDelimiter, _)) => {}
            Some((Token::EndObject, _)) => return Ok(Value::Object(entries)),
            Some((token, line)) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    line,
                    call: Some(call.to_string()),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    name: call.to_string(),
                    line: cursor.line,
                })
            }
        }
    }
}

fn insert_key(
    map: &mut HashMap<String, Value>,
    key: String,
    value: Value,
    line: usize,
    call: Option<&str>,
    options: &BuilderOptions,
) -> Result<(), ParseError> {
    if options.strict_keys && map.contains_key(&key) {
        return Err(ParseError::DuplicateKey {
            key,
            line,
            call: call.map(str::to_string),
        });
    }
    map.insert(key, value);
    Ok(())
}
