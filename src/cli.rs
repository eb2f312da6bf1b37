use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::backend;
use crate::config::{BackendKind, Config, OutputFormat};
use crate::interpreter::{self, line_col, tokenize, Error};

#[derive(Parser)]
#[command(name = "mlite")]
#[command(about = "mlite - run machine-learning workflow scripts", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a workflow script
    Run {
        /// Script to run
        file: PathBuf,

        /// Record backend operations instead of performing them
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream of a script
    Tokens {
        /// Script to lex
        file: PathBuf,
    },

    /// Print the parsed program as JSON
    Parse {
        /// Script to parse
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    let config = Config::builder().config_path(cli.config).build()?;

    match cli.command {
        Commands::Run {
            file,
            dry_run,
            json,
        } => {
            let source = read_source(&file)?;

            let mut backend_config = config.backend.clone();
            if dry_run {
                backend_config.kind = BackendKind::DryRun;
            }
            let report = interpreter::execute(&source, backend::from_config(&backend_config));

            if json || config.output.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for event in &report.trace {
                    println!("{}", event);
                }
            }

            if let Some(error) = report.error {
                match (error.line, error.column) {
                    (Some(line), Some(column)) => {
                        anyhow::bail!("{}:{}:{}: {}", file.display(), line, column, error.message)
                    }
                    _ => anyhow::bail!("{}: {}", file.display(), error.message),
                }
            }
        }

        Commands::Tokens { file } => {
            let source = read_source(&file)?;
            let tokens = tokenize(&source).map_err(|e| describe(&file, &source, Error::from(e)))?;

            for token in tokens {
                let (line, column) = line_col(&source, token.position);
                println!("{:>4}:{:<4} {:<11} {}", line, column, token.kind, token.literal);
            }
        }

        Commands::Parse { file } => {
            let source = read_source(&file)?;
            let program =
                interpreter::parse_program(&source).map_err(|e| describe(&file, &source, e))?;

            println!("{}", serde_json::to_string_pretty(&program)?);
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

/// Attach `file:line:column` to a pipeline error
fn describe(file: &Path, source: &str, error: Error) -> anyhow::Error {
    match error.position() {
        Some(pos) => {
            let (line, column) = line_col(source, pos);
            anyhow::Error::new(error).context(format!("{}:{}:{}", file.display(), line, column))
        }
        None => anyhow::Error::new(error),
    }
}
