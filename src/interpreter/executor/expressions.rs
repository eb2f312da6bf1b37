//! Expression evaluation
//!
//! Expressions are atoms: literals evaluate to themselves and identifiers are
//! looked up in the environment. Evaluation only reads the environment.

use super::super::errors::{RunResult, RuntimeError};
use super::super::types::{CompareOp, Environment, Expr, Val};

/// Evaluate an expression to a value
///
/// Returns `RuntimeError::UndefinedVariable` for an unbound identifier; there
/// is no default value.
pub fn eval_expr(expr: &Expr, env: &Environment) -> RunResult<Val> {
    match expr {
        Expr::LitNum { v } => Ok(Val::Num(*v)),

        Expr::LitStr { v } => Ok(Val::Str(v.clone())),

        Expr::Ident { name } => env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() }),
    }
}

/// Apply a comparison operator
///
/// `==` is value equality and never coerces, so `5 == "5"` is false. The
/// ordering operators coerce both operands to numbers first.
pub fn compare(left: &Val, op: CompareOp, right: &Val) -> RunResult<bool> {
    if op == CompareOp::Eq {
        return Ok(left == right);
    }

    let l = to_number(left, op)?;
    let r = to_number(right, op)?;

    Ok(match op {
        CompareOp::Gt => l > r,
        CompareOp::Lt => l < r,
        CompareOp::Gte => l >= r,
        CompareOp::Lte => l <= r,
        CompareOp::Eq => l == r,
    })
}

fn to_number(value: &Val, op: CompareOp) -> RunResult<f64> {
    value.as_number().ok_or_else(|| RuntimeError::NotNumeric {
        op,
        value: value.clone(),
    })
}

/// Resolve a loop count, which must be a non-negative integer
pub fn loop_count(value: &Val) -> RunResult<u64> {
    value.as_count().ok_or_else(|| RuntimeError::InvalidLoopCount {
        value: value.clone(),
    })
}
