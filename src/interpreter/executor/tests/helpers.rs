//! Test helpers for executor tests
//!
//! Common utilities for parsing programs and running them against a
//! recording backend

use crate::backend::{BackendCall, RecordingBackend};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::types::{Environment, Stmt, TraceEvent};
use crate::interpreter::{parse_program, Interpreter};

/// Everything observable after a run
pub struct Run {
    pub env: Environment,
    pub trace: Vec<TraceEvent>,
    pub calls: Vec<BackendCall>,
}

/// Parse source, serialize/deserialize the AST, and return the program
///
/// The JSON round trip makes sure every executed AST is also a valid
/// serialized AST.
pub fn parse(source: &str) -> Vec<Stmt> {
    let program = parse_program(source).expect("Parse program failed");
    let json = serde_json::to_string(&program).expect("Program serialization failed");
    serde_json::from_str(&json).expect("Program deserialization failed")
}

/// Run source in a fresh environment; the run must succeed
pub fn run_program(source: &str) -> Run {
    run_with(source, Environment::new(), RecordingBackend::new())
}

/// Run source with a prepared environment and backend; the run must succeed
pub fn run_with(source: &str, mut env: Environment, backend: RecordingBackend) -> Run {
    let program = parse(source);
    let mut interpreter = Interpreter::new(backend);
    interpreter
        .run(&program, &mut env)
        .expect("Program should run");

    let (backend, trace) = interpreter.into_parts();
    Run {
        env,
        trace,
        calls: backend.into_calls(),
    }
}

/// Run source that must fail; returns the error and the partial run
pub fn run_program_err(source: &str, backend: RecordingBackend) -> (RuntimeError, Run) {
    let program = parse(source);
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(backend);
    let err = interpreter
        .run(&program, &mut env)
        .expect_err("Program should fail");

    let (backend, trace) = interpreter.into_parts();
    (
        err,
        Run {
            env,
            trace,
            calls: backend.into_calls(),
        },
    )
}
