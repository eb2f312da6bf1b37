//! Execution backend - the collaborator that actually touches data and models
//!
//! The interpreter never loads files or fits models itself. It hands every
//! `load`/`save`/`train`/`predict` to an [`ExecutionBackend`] injected at
//! construction. Calls are blocking; the core imposes no timeout.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{BackendConfig, BackendKind};
use crate::interpreter::types::Val;

pub mod recording;
pub mod script;

pub use recording::{BackendCall, RecordingBackend};
pub use script::ScriptBackend;

/// Operation requested from a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendOp {
    Load,
    Save,
    Train,
    Predict,
}

impl BackendOp {
    pub fn name(self) -> &'static str {
        match self {
            BackendOp::Load => "load",
            BackendOp::Save => "save",
            BackendOp::Train => "train",
            BackendOp::Predict => "predict",
        }
    }
}

impl fmt::Display for BackendOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An identifier argument: its name, plus its value when the name is bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub value: Option<Val>,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: Option<Val>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Text handed to external tools: the bound value, else the bare name
    pub fn to_arg(&self) -> String {
        match &self.value {
            Some(v) => v.to_arg(),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Failed(String),

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Script '{script}' exited with {status}: {stderr}")]
    Script {
        script: String,
        status: String,
        stderr: String,
    },
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Build the backend selected by configuration
pub fn from_config(config: &BackendConfig) -> Box<dyn ExecutionBackend> {
    match config.kind {
        BackendKind::Script => Box::new(ScriptBackend::from_config(config)),
        BackendKind::DryRun => Box::new(RecordingBackend::new()),
    }
}

pub trait ExecutionBackend {
    fn load(&mut self, path: &str) -> BackendResult<()>;

    fn save(&mut self, path: &str) -> BackendResult<()>;

    fn train(&mut self, model: &Binding, features: &Binding, target: &Binding)
        -> BackendResult<()>;

    fn predict(&mut self, model: &Binding, input: &[f64]) -> BackendResult<Val>;
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for &mut B {
    fn load(&mut self, path: &str) -> BackendResult<()> {
        (**self).load(path)
    }

    fn save(&mut self, path: &str) -> BackendResult<()> {
        (**self).save(path)
    }

    fn train(
        &mut self,
        model: &Binding,
        features: &Binding,
        target: &Binding,
    ) -> BackendResult<()> {
        (**self).train(model, features, target)
    }

    fn predict(&mut self, model: &Binding, input: &[f64]) -> BackendResult<Val> {
        (**self).predict(model, input)
    }
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for Box<B> {
    fn load(&mut self, path: &str) -> BackendResult<()> {
        (**self).load(path)
    }

    fn save(&mut self, path: &str) -> BackendResult<()> {
        (**self).save(path)
    }

    fn train(
        &mut self,
        model: &Binding,
        features: &Binding,
        target: &Binding,
    ) -> BackendResult<()> {
        (**self).train(model, features, target)
    }

    fn predict(&mut self, model: &Binding, input: &[f64]) -> BackendResult<Val> {
        (**self).predict(model, input)
    }
}
