//! Error taxonomy for the lex → parse → run pipeline
//!
//! Every error aborts the pipeline stage that raised it. Hosts that need a
//! reportable result instead of an `Err` use [`ErrorKind`] to categorize it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::token::TokenKind;
use super::types::{CompareOp, Val};
use crate::backend::{BackendError, BackendOp};

/* ===================== Lexing ===================== */

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unexpected character {character:?} at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Malformed number literal '{literal}' at position {position}")]
    MalformedNumber { literal: String, position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { position }
            | LexError::UnexpectedCharacter { position, .. }
            | LexError::MalformedNumber { position, .. } => *position,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;

/* ===================== Parsing ===================== */

/// Unexpected or missing token
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "Syntax error: expected {}, got {found} at position {position}",
    expected_list(.expected)
)]
pub struct UnexpectedToken {
    pub expected: Vec<TokenKind>,
    pub found: TokenKind,
    pub literal: String,
    pub position: usize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error(transparent)]
    Unexpected(#[from] UnexpectedToken),

    #[error("Syntax error: blocks nested deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },
}

impl SyntaxError {
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::Unexpected(e) => e.position,
            SyntaxError::TooDeep { position, .. } => *position,
        }
    }
}

fn expected_list(expected: &[TokenKind]) -> String {
    match expected {
        [single] => single.to_string(),
        _ => {
            let names: Vec<&str> = expected.iter().map(|k| k.name()).collect();
            format!("one of [{}]", names.join(", "))
        }
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/* ===================== Execution ===================== */

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("Cannot convert {value} to a number for '{op}' comparison")]
    NotNumeric { op: CompareOp, value: Val },

    #[error("Invalid loop count {value}: expected a non-negative integer")]
    InvalidLoopCount { value: Val },

    #[error("Blocks nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Backend {operation}({}) failed: {source}", .args.join(", "))]
    Backend {
        operation: BackendOp,
        args: Vec<String>,
        #[source]
        source: BackendError,
    },
}

pub type RunResult<T> = Result<T, RuntimeError>;

/* ===================== Pipeline ===================== */

/// Any failure from lexing, parsing or running a program
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Error category as seen by hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "LexError")]
    Lex,
    #[serde(rename = "SyntaxError")]
    Syntax,
    #[serde(rename = "NameError")]
    Name,
    #[serde(rename = "TypeError")]
    Type,
    #[serde(rename = "BackendError")]
    Backend,
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UndefinedVariable { .. } => ErrorKind::Name,
            RuntimeError::NotNumeric { .. } | RuntimeError::InvalidLoopCount { .. } => {
                ErrorKind::Type
            }
            RuntimeError::TooDeep { .. } => ErrorKind::Syntax,
            RuntimeError::Backend { .. } => ErrorKind::Backend,
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex(_) => ErrorKind::Lex,
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Runtime(e) => e.kind(),
        }
    }

    /// Source offset of the failure, when one is known
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Lex(e) => Some(e.position()),
            Error::Syntax(e) => Some(e.position()),
            Error::Runtime(_) => None,
        }
    }
}
