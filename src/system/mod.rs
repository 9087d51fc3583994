//! External command execution for the probes
//!
//! The probes never spawn processes themselves; they go through a
//! [`CommandRunner`] so the parsing and health logic can run against
//! canned output:
//! - `LocalRunner`: real processes via `tokio::process`, with a deadline
//! - `MockRunner`: canned stdout or failures keyed by program name (tests
//!   and the `test-util` feature)

mod local;

pub use local::LocalRunner;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockResponse, MockRunner};

use crate::error::Result;

/// Runs an external program to completion and returns its standard output.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`; a non-zero exit, spawn failure or expired
    /// deadline is an error.
    async fn run(&self, program: &str, args: &[String]) -> Result<String>;
}
