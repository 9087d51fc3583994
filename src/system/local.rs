//! Process-backed implementation of CommandRunner

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::CommandRunner;
use crate::error::{ProbeError, Result};

/// Spawns real processes. The child is killed when the deadline expires.
#[derive(Debug, Clone, Copy)]
pub struct LocalRunner {
    timeout: Duration,
}

impl LocalRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait::async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        tracing::debug!("Running {} {:?}", program, args);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::Timeout {
                program: program.to_string(),
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|source| ProbeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::ExitStatus {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
