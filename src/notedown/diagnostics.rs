//! Non-fatal diagnostics
//!
//! Warnings are style issues the translator notices along the way (a
//! lower-case call name, a block directive with no body). They are collected
//! next to the output and surfaced on a side channel by the caller; they
//! never interrupt a translation.

use std::fmt;

/// A non-fatal diagnostic tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

impl Warning {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Warning {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning (line {}): {}", self.line, self.message)
    }
}
