//! Buffer-pool probe
//!
//! Runs the database's interactive SQL client with the status script and
//! reads the buffer line of the report, e.g.
//!
//! ```text
//!   40000 buffers, 100 used, 2 dirty, 0 wired down, repl age 0 ...
//! ```

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::parse_count;
use crate::config::ProbeConfig;
use crate::error::{ParseError, Result};
use crate::system::CommandRunner;

/// Buffer-pool occupancy reported by the database
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BufferStats {
    pub total: u64,
    pub used: u64,
    pub dirty: u64,
    pub percent_used: f64,
    pub percent_free: f64,
    pub healthy: bool,
}

static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+) buffers").unwrap());
static USED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r", (\d+) used").unwrap());
static DIRTY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r", (\d+) dirty").unwrap());

fn capture(
    re: &Regex,
    field: &'static str,
    output: &str,
) -> std::result::Result<u64, ParseError> {
    let digits = re
        .captures(output)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseError::MissingField(field))?;
    parse_count(field, digits.as_str())
}

impl BufferStats {
    /// Extract the buffer counters from the status report.
    ///
    /// Percentages are only filled in when both the total and the used count
    /// are non-zero.
    pub fn parse(output: &str) -> std::result::Result<Self, ParseError> {
        let total = capture(&TOTAL_RE, "buffers", output)?;
        let used = capture(&USED_RE, "used", output)?;
        let dirty = capture(&DIRTY_RE, "dirty", output)?;

        let mut stats = BufferStats {
            total,
            used,
            dirty,
            ..Default::default()
        };

        if total > 0 && used > 0 {
            stats.percent_free = (total as f64 - used as f64) / total as f64 * 100.0;
            stats.percent_used = 100.0 - stats.percent_free;
        }

        Ok(stats)
    }

    /// Mark healthy when at least `threshold` percent of the pool is free
    pub fn assess(mut self, threshold: f64) -> Self {
        self.healthy = self.percent_free >= threshold;
        self
    }
}

/// Arguments passed to the SQL client: endpoint, credentials, script
pub fn command_args(config: &ProbeConfig) -> Vec<String> {
    vec![
        config.endpoint.clone(),
        config.username.clone(),
        config.password.clone(),
        config.status_script.clone(),
    ]
}

/// Run the SQL client and assess the buffer pool
pub async fn probe(runner: &dyn CommandRunner, config: &ProbeConfig) -> Result<BufferStats> {
    let output = runner
        .run(&config.isql_program, &command_args(config))
        .await?;
    let stats = BufferStats::parse(&output)?.assess(config.buffers_threshold);

    tracing::debug!(
        "Buffers: {} total, {} used, {} dirty ({:.2}% free)",
        stats.total,
        stats.used,
        stats.dirty,
        stats.percent_free
    );

    Ok(stats)
}
