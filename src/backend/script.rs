//! Backend that runs one external script per operation
//!
//! Each call becomes `<interpreter> <scripts_dir>/<op>.py <args...>`, e.g.
//! `python3 python/train.py linear_regression data.csv price`. Script stdout is
//! logged; a non-zero exit status fails the call with the script's stderr.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use super::{Binding, BackendError, BackendOp, BackendResult, ExecutionBackend};
use crate::config::BackendConfig;
use crate::interpreter::types::Val;

#[derive(Debug, Clone)]
pub struct ScriptBackend {
    interpreter: String,
    scripts_dir: PathBuf,
}

impl ScriptBackend {
    pub fn new(interpreter: impl Into<String>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            scripts_dir: scripts_dir.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.interpreter.clone(), config.scripts_dir.clone())
    }

    pub fn script_path(&self, op: BackendOp) -> PathBuf {
        self.scripts_dir.join(format!("{}.py", op))
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Run the script for `op` and return its stdout
    fn run_script(&self, op: BackendOp, args: &[String]) -> BackendResult<String> {
        let script = self.script_path(op);
        debug!(interpreter = %self.interpreter, script = %script.display(), ?args, "Running backend script");

        let output = Command::new(&self.interpreter)
            .arg(&script)
            .args(args)
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.interpreter.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(BackendError::Script {
                script: script.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        for line in stdout.lines() {
            info!(op = %op, "{}", line);
        }
        Ok(stdout)
    }
}

impl ExecutionBackend for ScriptBackend {
    fn load(&mut self, path: &str) -> BackendResult<()> {
        self.run_script(BackendOp::Load, &[path.to_string()])?;
        Ok(())
    }

    fn save(&mut self, path: &str) -> BackendResult<()> {
        self.run_script(BackendOp::Save, &[path.to_string()])?;
        Ok(())
    }

    fn train(
        &mut self,
        model: &Binding,
        features: &Binding,
        target: &Binding,
    ) -> BackendResult<()> {
        let args = [model.to_arg(), features.to_arg(), target.to_arg()];
        self.run_script(BackendOp::Train, &args)?;
        Ok(())
    }

    /// The last non-empty stdout line is the prediction: a number when it
    /// parses as one, otherwise the raw text.
    fn predict(&mut self, model: &Binding, input: &[f64]) -> BackendResult<Val> {
        let vector: Vec<String> = input.iter().map(|v| v.to_string()).collect();
        let stdout = self.run_script(BackendOp::Predict, &[model.to_arg(), vector.join(",")])?;

        let last = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .ok_or_else(|| BackendError::Failed("predict script produced no output".to_string()))?;

        Ok(match last.parse::<f64>() {
            Ok(n) => Val::Num(n),
            Err(_) => Val::Str(last.to_string()),
        })
    }
}
