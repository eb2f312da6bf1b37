pub mod backend;
pub mod cli;
pub mod config;
pub mod interpreter;

// Re-export the pipeline entry points
pub use backend::{ExecutionBackend, RecordingBackend, ScriptBackend};
pub use interpreter::{execute, parse_program, run_source, Error, Interpreter, RunReport};
