//! Configuration loading
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML file: `--config` / `MLITE_CONFIG_PATH`, else an optional `mlite.toml`
//!    in the working directory
//! 3. Environment variables: `MLITE_BACKEND__INTERPRETER=python3.12`
//!
//! A `.env` file is read before the environment is consulted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "MLITE";
const CONFIG_PATH_VAR: &str = "MLITE_CONFIG_PATH";
const DEFAULT_FILE: &str = "mlite";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Run external scripts for every operation
    Script,
    /// Record operations without performing them
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Program used to run backend scripts
    pub interpreter: String,
    /// Directory holding `load.py`, `save.py`, `train.py` and `predict.py`
    pub scripts_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Script,
            interpreter: "python3".to_string(),
            scripts_dir: PathBuf::from("python"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load configuration from the default sources
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Explicit config file; it must exist
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Ignore `.env` and `MLITE_*` variables
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn build(self) -> Result<Config> {
        if !self.skip_env {
            dotenvy::dotenv().ok();
        }

        let defaults = BackendConfig::default();
        let mut builder = config::Config::builder()
            .set_default("backend.kind", "script")?
            .set_default("backend.interpreter", defaults.interpreter)?
            .set_default(
                "backend.scripts_dir",
                defaults.scripts_dir.to_string_lossy().into_owned(),
            )?
            .set_default("output.format", "text")?;

        let explicit = match self.config_path {
            Some(path) => Some(path),
            None if !self.skip_env => std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from),
            None => None,
        };

        builder = match &explicit {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_FILE).required(false)),
        };

        if !self.skip_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let settings = builder.build().with_context(|| match &explicit {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        })?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mlite-{}-{}.toml", name, std::process::id()));
        fs::write(&path, body).expect("Should write config");
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::builder().skip_env(true).build().expect("Should load");

        assert_eq!(config, Config::default());
        assert_eq!(config.backend.kind, BackendKind::Script);
        assert_eq!(config.backend.interpreter, "python3");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_config(
            "override",
            r#"
                [backend]
                kind = "dry_run"
                scripts_dir = "/opt/mlite/scripts"

                [output]
                format = "json"
            "#,
        );

        let config = Config::builder()
            .config_path(Some(path.clone()))
            .skip_env(true)
            .build()
            .expect("Should load");

        assert_eq!(config.backend.kind, BackendKind::DryRun);
        assert_eq!(config.backend.scripts_dir, PathBuf::from("/opt/mlite/scripts"));
        assert_eq!(config.backend.interpreter, "python3");
        assert_eq!(config.output.format, OutputFormat::Json);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Config::builder()
            .config_path(Some(PathBuf::from("/nonexistent/mlite.toml")))
            .skip_env(true)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_kind_is_error() {
        let path = write_config("invalid", "[backend]\nkind = \"quantum\"\n");

        let result = Config::builder()
            .config_path(Some(path.clone()))
            .skip_env(true)
            .build();
        assert!(result.is_err());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_to_toml() {
        let rendered = Config::default().to_toml().expect("Should render");

        assert!(rendered.contains("[backend]"));
        assert!(rendered.contains("kind = \"script\""));
        assert!(rendered.contains("interpreter = \"python3\""));
        assert!(rendered.contains("format = \"text\""));
    }
}
