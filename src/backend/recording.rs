//! In-memory backend that records calls instead of performing them
//!
//! Used for dry runs and as the deterministic fake in tests.

use serde::{Deserialize, Serialize};

use super::{Binding, BackendError, BackendOp, BackendResult, ExecutionBackend};
use crate::interpreter::types::Val;

/// A call received by a [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BackendCall {
    Load {
        path: String,
    },
    Save {
        path: String,
    },
    Train {
        model: Binding,
        features: Binding,
        target: Binding,
    },
    Predict {
        model: Binding,
        input: Vec<f64>,
    },
}

impl BackendCall {
    pub fn op(&self) -> BackendOp {
        match self {
            BackendCall::Load { .. } => BackendOp::Load,
            BackendCall::Save { .. } => BackendOp::Save,
            BackendCall::Train { .. } => BackendOp::Train,
            BackendCall::Predict { .. } => BackendOp::Predict,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    prediction: Val,
    fail_on: Option<BackendOp>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            prediction: Val::Num(0.0),
            fail_on: None,
        }
    }

    /// Value returned by every `predict`
    pub fn with_prediction(mut self, prediction: Val) -> Self {
        self.prediction = prediction;
        self
    }

    /// Make every call of `op` fail after it has been recorded
    pub fn failing_on(mut self, op: BackendOp) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<BackendCall> {
        self.calls
    }

    fn record(&mut self, call: BackendCall) -> BackendResult<()> {
        let op = call.op();
        self.calls.push(call);
        if self.fail_on == Some(op) {
            return Err(BackendError::Failed(format!("{} rejected by recording backend", op)));
        }
        Ok(())
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionBackend for RecordingBackend {
    fn load(&mut self, path: &str) -> BackendResult<()> {
        self.record(BackendCall::Load {
            path: path.to_string(),
        })
    }

    fn save(&mut self, path: &str) -> BackendResult<()> {
        self.record(BackendCall::Save {
            path: path.to_string(),
        })
    }

    fn train(
        &mut self,
        model: &Binding,
        features: &Binding,
        target: &Binding,
    ) -> BackendResult<()> {
        self.record(BackendCall::Train {
            model: model.clone(),
            features: features.clone(),
            target: target.clone(),
        })
    }

    fn predict(&mut self, model: &Binding, input: &[f64]) -> BackendResult<Val> {
        self.record(BackendCall::Predict {
            model: model.clone(),
            input: input.to_vec(),
        })?;
        Ok(self.prediction.clone())
    }
}
