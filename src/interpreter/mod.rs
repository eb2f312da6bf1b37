//! mlite interpreter pipeline: source text → tokens → AST → execution
//!
//! ```
//! use mlite_core::backend::RecordingBackend;
//! use mlite_core::interpreter::run_source;
//!
//! let outcome = run_source(r#"let x = 5; if (x > 3) { save("yes.csv") }"#, RecordingBackend::new())
//!     .expect("program should run");
//! assert_eq!(outcome.trace.len(), 3);
//! ```

pub mod errors;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod types;

pub use errors::{Error, ErrorKind, LexError, RuntimeError, SyntaxError, UnexpectedToken};
pub use executor::Interpreter;
pub use lexer::{line_col, tokenize, Lexer};
pub use parser::{Parser, MAX_NESTING};
pub use token::{Token, TokenKind};
pub use types::{CompareOp, Environment, Expr, ModelHandle, Stmt, TraceEvent, Val};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::backend::ExecutionBackend;

/// Lex and parse a complete program
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, Error> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Final state of a successful run
#[derive(Debug, Clone)]
pub struct Outcome {
    pub env: Environment,
    pub trace: Vec<TraceEvent>,
}

/// Parse and run `source` in a fresh environment
pub fn run_source<B: ExecutionBackend>(source: &str, backend: B) -> Result<Outcome, Error> {
    let program = parse_program(source)?;
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(backend);
    interpreter.run(&program, &mut env)?;

    let (_, trace) = interpreter.into_parts();
    Ok(Outcome { env, trace })
}

/* ===================== Host Reports ===================== */

/// Serializable summary of a run for hosts that report instead of failing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub success: bool,
    pub trace: Vec<TraceEvent>,
    pub variables: BTreeMap<String, Val>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl ErrorReport {
    pub fn from_error(error: &Error, source: &str) -> Self {
        let position = error.position();
        let (line, column) = match position {
            Some(pos) => {
                let (line, column) = line_col(source, pos);
                (Some(line), Some(column))
            }
            None => (None, None),
        };

        Self {
            kind: error.kind(),
            message: error.to_string(),
            position,
            line,
            column,
        }
    }
}

/// Parse and run `source`, converting any failure into the report
///
/// On a runtime failure the report keeps the trace and variables produced up
/// to the failing statement.
pub fn execute<B: ExecutionBackend>(source: &str, backend: B) -> RunReport {
    let program = match parse_program(source) {
        Ok(program) => program,
        Err(e) => return failed_report(&e, source, Vec::new(), BTreeMap::new()),
    };

    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(backend);
    let result = interpreter.run(&program, &mut env);
    let trace = interpreter.take_trace();

    match result {
        Ok(()) => RunReport {
            success: true,
            trace,
            variables: env.snapshot(),
            error: None,
        },
        Err(e) => failed_report(&Error::from(e), source, trace, env.snapshot()),
    }
}

fn failed_report(
    error: &Error,
    source: &str,
    trace: Vec<TraceEvent>,
    variables: BTreeMap<String, Val>,
) -> RunReport {
    warn!(kind = ?error.kind(), "Run failed: {}", error);
    RunReport {
        success: false,
        trace,
        variables,
        error: Some(ErrorReport::from_error(error, source)),
    }
}
