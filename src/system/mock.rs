//! Canned implementation of CommandRunner for tests
//!
//! Responses are keyed by program name. Unknown programs behave like a
//! missing binary.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use super::CommandRunner;
use crate::error::{ProbeError, Result};

/// What a mocked program does when run
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Exit successfully with this stdout
    Stdout(String),
    /// Exit with a non-zero status and this stderr
    Exit { code: i32, stderr: String },
    /// Never finish before the deadline
    Timeout { timeout_secs: u64 },
}

/// Mock runner for tests
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for `program`
    pub fn with_response(self, program: &str, response: MockResponse) -> Self {
        self.set_response(program, response);
        self
    }

    pub fn with_stdout(self, program: &str, stdout: &str) -> Self {
        self.with_response(program, MockResponse::Stdout(stdout.to_string()))
    }

    /// Replace the response for `program`
    pub fn set_response(&self, program: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(program.to_string(), response);
    }

    /// Programs run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, _args: &[String]) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(program.to_string());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(program)
            .cloned();

        match response {
            Some(MockResponse::Stdout(stdout)) => Ok(stdout),
            Some(MockResponse::Exit { code, stderr }) => Err(ProbeError::ExitStatus {
                program: program.to_string(),
                code: Some(code),
                stderr,
            }),
            Some(MockResponse::Timeout { timeout_secs }) => Err(ProbeError::Timeout {
                program: program.to_string(),
                timeout_secs,
            }),
            None => Err(ProbeError::Spawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "program not mocked"),
            }),
        }
    }
}
