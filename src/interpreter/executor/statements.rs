//! Statement execution handlers
//!
//! Each statement kind has its own handler. Backend failures are wrapped with
//! the operation and its arguments before they abort the run.

use super::super::errors::{RunResult, RuntimeError};
use super::super::types::{CompareOp, Environment, Expr, Stmt, TraceEvent};
use super::expressions::{compare, eval_expr, loop_count};
use super::Interpreter;
use crate::backend::{BackendError, BackendOp, Binding, ExecutionBackend};

fn backend_error(operation: BackendOp, args: Vec<String>, source: BackendError) -> RuntimeError {
    RuntimeError::Backend {
        operation,
        args,
        source,
    }
}

/// Identifier argument with its current binding, if any
fn binding(name: &str, env: &Environment) -> Binding {
    Binding::new(name, env.get(name).cloned())
}

/* ===================== Assignment ===================== */

/// Execute Let / Set - both bind the name, creating or overwriting it
pub fn execute_assign<B: ExecutionBackend>(
    interp: &mut Interpreter<B>,
    name: &str,
    value: &Expr,
    env: &mut Environment,
) -> RunResult<()> {
    let value = eval_expr(value, env)?;
    env.bind(name, value.clone());
    interp.record(TraceEvent::Assign {
        name: name.to_string(),
        value,
    });
    Ok(())
}

/* ===================== Backend Operations ===================== */

pub fn execute_load<B: ExecutionBackend>(interp: &mut Interpreter<B>, file: &str) -> RunResult<()> {
    interp
        .backend
        .load(file)
        .map_err(|e| backend_error(BackendOp::Load, vec![file.to_string()], e))?;
    interp.record(TraceEvent::Load {
        file: file.to_string(),
    });
    Ok(())
}

pub fn execute_save<B: ExecutionBackend>(interp: &mut Interpreter<B>, file: &str) -> RunResult<()> {
    interp
        .backend
        .save(file)
        .map_err(|e| backend_error(BackendOp::Save, vec![file.to_string()], e))?;
    interp.record(TraceEvent::Save {
        file: file.to_string(),
    });
    Ok(())
}

/// Execute Train - the environment is only read, never written
pub fn execute_train<B: ExecutionBackend>(
    interp: &mut Interpreter<B>,
    model: &str,
    features: &str,
    target: &str,
    env: &Environment,
) -> RunResult<()> {
    let model_arg = binding(model, env);
    let features_arg = binding(features, env);
    let target_arg = binding(target, env);

    interp
        .backend
        .train(&model_arg, &features_arg, &target_arg)
        .map_err(|e| {
            let args = vec![model_arg.to_arg(), features_arg.to_arg(), target_arg.to_arg()];
            backend_error(BackendOp::Train, args, e)
        })?;

    interp.record(TraceEvent::Train {
        model: model.to_string(),
        features: features.to_string(),
        target: target.to_string(),
    });
    Ok(())
}

pub fn execute_predict<B: ExecutionBackend>(
    interp: &mut Interpreter<B>,
    model: &str,
    input: &[f64],
    env: &Environment,
) -> RunResult<()> {
    let model_arg = binding(model, env);

    let result = interp.backend.predict(&model_arg, input).map_err(|e| {
        let vector: Vec<String> = input.iter().map(|v| v.to_string()).collect();
        let args = vec![model_arg.to_arg(), format!("[{}]", vector.join(", "))];
        backend_error(BackendOp::Predict, args, e)
    })?;

    interp.record(TraceEvent::Predict {
        model: model.to_string(),
        input: input.to_vec(),
        result,
    });
    Ok(())
}

/* ===================== Control Flow ===================== */

/// Execute If - the body runs at most once; there is no else branch
pub fn execute_if<B: ExecutionBackend>(
    interp: &mut Interpreter<B>,
    left: &Expr,
    op: CompareOp,
    right: &Expr,
    body: &[Stmt],
    env: &mut Environment,
) -> RunResult<()> {
    let left = eval_expr(left, env)?;
    let right = eval_expr(right, env)?;
    let taken = compare(&left, op, &right)?;

    interp.record(TraceEvent::Branch {
        left,
        op,
        right,
        taken,
    });

    if taken {
        interp.run_body(body, env)?;
    }
    Ok(())
}

/// Execute Loop - the count is evaluated once, on entry
pub fn execute_loop<B: ExecutionBackend>(
    interp: &mut Interpreter<B>,
    count: &Expr,
    body: &[Stmt],
    env: &mut Environment,
) -> RunResult<()> {
    let count = loop_count(&eval_expr(count, env)?)?;

    for index in 1..=count {
        interp.record(TraceEvent::Iteration { index, count });
        interp.run_body(body, env)?;
    }
    Ok(())
}
