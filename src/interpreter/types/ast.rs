//! Abstract Syntax Tree node types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Statement AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    Load {
        file: String,
    },
    Save {
        file: String,
    },
    Train {
        model: String,
        features: String,
        target: String,
    },
    Predict {
        model: String,
        input: Vec<f64>,
    },
    Let {
        name: String,
        value: Expr,
    },
    Set {
        name: String,
        value: Expr,
    },
    If {
        left: Expr,
        op: CompareOp,
        right: Expr,
        body: Vec<Stmt>,
    },
    Loop {
        count: Expr,
        body: Vec<Stmt>,
    },
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    LitNum { v: f64 },
    LitStr { v: String },
    Ident { name: String },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::LitNum { v } => write!(f, "{}", v),
            Expr::LitStr { v } => write!(f, "\"{}\"", v),
            Expr::Ident { name } => f.write_str(name),
        }
    }
}

/// Comparison operator of an `if` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
