// src/error.rs
use thiserror::Error;

/// Errors surfaced by the template pipeline and the CLI.
///
/// The rich-text compiler itself never fails: malformed markup is repaired,
/// unknown constructs are ignored and unresolvable images fall back to empty
/// sizes. Only the outer layers report errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid render options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid arguments: {0}")]
    Arguments(String),
}
