//! # Executor - tree-walking interpreter
//!
//! Runs a parsed program statement by statement against a caller-owned
//! [`Environment`], dispatching side effects to the injected backend.
//!
//! ## Core Principles
//!
//! 1. **Flat environment**: nested `if`/`loop` bodies read and write the same
//!    environment as the top level; there is no block scoping
//! 2. **Fail fast**: the first error aborts the whole run, nothing is skipped
//! 3. **Explicit trace**: every executed action is appended to the trace in
//!    program order, and also logged through `tracing`
//!
//! One interpreter serves one run at a time. Hosts handling several requests
//! build one interpreter and one environment per request.

use tracing::{debug, info, info_span};

use super::errors::{RunResult, RuntimeError};
use super::parser::MAX_NESTING;
use super::types::{Environment, Stmt, TraceEvent};
use crate::backend::ExecutionBackend;

pub mod expressions;
pub mod statements;

#[cfg(test)]
mod tests;

pub use expressions::{compare, eval_expr, loop_count};

pub struct Interpreter<B: ExecutionBackend> {
    backend: B,
    trace: Vec<TraceEvent>,
    depth: usize,
}

impl<B: ExecutionBackend> Interpreter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            trace: Vec::new(),
            depth: 0,
        }
    }

    /// Execute `program` in order against `env`
    ///
    /// Trace events accumulate across calls; on error the trace holds every
    /// action completed before the failure.
    pub fn run(&mut self, program: &[Stmt], env: &mut Environment) -> RunResult<()> {
        let span = info_span!("run", statements = program.len());
        let _enter = span.enter();

        self.run_block(program, env)
    }

    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.trace)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_parts(self) -> (B, Vec<TraceEvent>) {
        (self.backend, self.trace)
    }

    fn run_block(&mut self, body: &[Stmt], env: &mut Environment) -> RunResult<()> {
        for stmt in body {
            self.execute(stmt, env)?;
        }
        Ok(())
    }

    /// Run the body of an `if` or `loop`, bounded like the parser bounds it
    fn run_body(&mut self, body: &[Stmt], env: &mut Environment) -> RunResult<()> {
        if self.depth == MAX_NESTING {
            return Err(RuntimeError::TooDeep { limit: MAX_NESTING });
        }

        self.depth += 1;
        let result = self.run_block(body, env);
        self.depth -= 1;
        result
    }

    fn execute(&mut self, stmt: &Stmt, env: &mut Environment) -> RunResult<()> {
        match stmt {
            Stmt::Let { name, value } | Stmt::Set { name, value } => {
                statements::execute_assign(self, name, value, env)
            }
            Stmt::Load { file } => statements::execute_load(self, file),
            Stmt::Save { file } => statements::execute_save(self, file),
            Stmt::Train {
                model,
                features,
                target,
            } => statements::execute_train(self, model, features, target, env),
            Stmt::Predict { model, input } => statements::execute_predict(self, model, input, env),
            Stmt::If {
                left,
                op,
                right,
                body,
            } => statements::execute_if(self, left, *op, right, body, env),
            Stmt::Loop { count, body } => statements::execute_loop(self, count, body, env),
        }
    }

    fn record(&mut self, event: TraceEvent) {
        match &event {
            TraceEvent::Assign { .. } | TraceEvent::Branch { .. } | TraceEvent::Iteration { .. } => {
                debug!("{}", event)
            }
            _ => info!("{}", event),
        }
        self.trace.push(event);
    }
}
