//! IRC message parsing and formatting.
//!
//! # Responsibilities
//! - Parse one `[:prefix] COMMAND params [:trailing]` line into a message
//! - Format a message back into wire form
//!
//! # Design Decisions
//! - The trailing parameter is folded into `params` as the last entry;
//!   formatting re-adds the `:` when the last parameter needs it
//! - No command registry: unknown commands parse fine and are the caller's
//!   problem

use std::fmt;

use thiserror::Error;

/// Error type for message parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line was empty after stripping line endings.
    #[error("empty message line")]
    Empty,

    /// A prefix was present but no command followed.
    #[error("message has a prefix but no command")]
    MissingCommand,
}

/// A single IRC protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Origin prefix, without the leading `:`.
    pub prefix: Option<String>,
    /// Command or numeric reply.
    pub command: String,
    /// Parameters in order; a trailing parameter is the last entry.
    pub params: Vec<String>,
}

impl Message {
    /// Build an outbound message.
    pub fn new(command: &str, params: &[&str]) -> Self {
        Self {
            prefix: None,
            command: command.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The reply to a PING carrying `token`.
    pub fn pong(token: &str) -> Self {
        Self::new("PONG", &[token])
    }

    /// Parse one line. Line endings are stripped first.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut rest = line;

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, tail) = stripped
                    .split_once(' ')
                    .ok_or(ParseError::MissingCommand)?;
                rest = tail.trim_start_matches(' ');
                Some(prefix.to_string())
            }
            None => None,
        };

        let command = match rest.split_once(' ') {
            Some((command, tail)) => {
                rest = tail.trim_start_matches(' ');
                command.to_string()
            }
            None => {
                let command = rest.to_string();
                rest = "";
                command
            }
        };
        if command.is_empty() {
            return Err(ParseError::MissingCommand);
        }

        let mut params = Vec::new();
        while !rest.is_empty() {
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match rest.split_once(' ') {
                Some((param, tail)) => {
                    params.push(param.to_string());
                    rest = tail.trim_start_matches(' ');
                }
                None => {
                    params.push(rest.to_string());
                    break;
                }
            }
        }

        Ok(Self {
            prefix,
            command,
            params,
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;

        if let Some((last, init)) = self.params.split_last() {
            for param in init {
                write!(f, " {}", param)?;
            }
            if last.is_empty() || last.starts_with(':') || last.contains(' ') {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }
        Ok(())
    }
}
