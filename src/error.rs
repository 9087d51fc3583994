/*!
 * Error types for the health probe
 */

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Failure of a single probe: running the external tool or reading its output.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// External binary missing or not executable
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// External tool ran but exited unsuccessfully
    #[error("`{program}` exited with {}: {stderr}", exit_description(.code))]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External tool did not finish before the deadline
    #[error("`{program}` did not finish within {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },

    /// Output did not have the expected shape
    #[error("unexpected output: {0}")]
    Parse(#[from] ParseError),
}

impl ProbeError {
    /// Stable tag used in the JSON response
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Spawn { .. } => "spawn",
            ProbeError::ExitStatus { .. } => "exit_status",
            ProbeError::Timeout { .. } => "timeout",
            ProbeError::Parse(_) => "parse",
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Output-shape failures reported by the probe parsers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unexpected field count: expected at least {expected}, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("no `{0}` row in output")]
    MissingRow(&'static str),
}

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
