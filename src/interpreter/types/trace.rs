//! Trace events recorded while a program runs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ast::CompareOp;
use super::values::Val;

/// One executed action, in program order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TraceEvent {
    Assign {
        name: String,
        value: Val,
    },
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
        result: Val,
    },
    /// An `if` condition was evaluated; `taken` says whether the body ran
    Branch {
        left: Val,
        op: CompareOp,
        right: Val,
        taken: bool,
    },
    /// A loop body is about to run for the `index`-th time (1-based)
    Iteration {
        index: u64,
        count: u64,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Assign { name, value } => write!(f, "Set variable {} = {}", name, value),
            TraceEvent::Load { file } => write!(f, "Loading file: {}", file),
            TraceEvent::Save { file } => write!(f, "Saving to file: {}", file),
            TraceEvent::Train {
                model,
                features,
                target,
            } => write!(
                f,
                "Training model: {} on data: {} with target: {}",
                model, features, target
            ),
            TraceEvent::Predict {
                model,
                input,
                result,
            } => write!(f, "Prediction from {} for {:?}: {}", model, input, result),
            TraceEvent::Branch {
                left,
                op,
                right,
                taken,
            } => {
                if *taken {
                    write!(f, "Condition '{} {} {}' is true; executing block", left, op, right)
                } else {
                    write!(f, "Condition '{} {} {}' is false; skipping block", left, op, right)
                }
            }
            TraceEvent::Iteration { index, count } => {
                write!(f, "Iteration {} of {}", index, count)
            }
        }
    }
}
