//! Type definitions for the interpreter
//!
//! - AST nodes (Stmt, Expr, CompareOp)
//! - Runtime values (Val, ModelHandle) and the Environment
//! - Trace events emitted while running

pub mod ast;
pub mod trace;
pub mod values;

pub use ast::{CompareOp, Expr, Stmt};
pub use trace::TraceEvent;
pub use values::{Environment, ModelHandle, Val};
