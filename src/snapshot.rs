//! Status snapshot returned by the health route
//!
//! A snapshot is built fresh for every request. Each subsystem carries its
//! own status: a failed probe keeps its numbers at zero, is unhealthy, and
//! records why it failed instead of aborting the whole response.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{HealthPolicy, ProbeConfig};
use crate::error::ProbeError;
use crate::probe::{BufferStats, DiskStats, MemoryStats};

/// Whether a probe produced usable numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Failed,
}

/// Why a probe failed, as reported on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    /// One of `spawn`, `exit_status`, `timeout`, `parse`
    pub kind: &'static str,
    pub message: String,
}

impl From<&ProbeError> for ProbeFailure {
    fn from(err: &ProbeError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// One subsystem's section of the snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subsystem<T> {
    pub status: ProbeStatus,

    #[serde(flatten)]
    pub stats: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProbeFailure>,
}

impl<T: Default> Subsystem<T> {
    pub fn ok(stats: T) -> Self {
        Self {
            status: ProbeStatus::Ok,
            stats,
            error: None,
        }
    }

    /// Zeroed stats plus the failure reason
    pub fn failed(err: &ProbeError) -> Self {
        Self {
            status: ProbeStatus::Failed,
            stats: T::default(),
            error: Some(ProbeFailure::from(err)),
        }
    }

    pub fn from_result(result: &Result<T, ProbeError>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(stats) => Self::ok(stats.clone()),
            Err(err) => Self::failed(err),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ProbeStatus::Ok
    }
}

/// Aggregate health of the database host at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub timestamp: DateTime<Utc>,
    pub healthy: bool,
    pub policy: HealthPolicy,
    pub buffers: Subsystem<BufferStats>,
    pub disk: Subsystem<DiskStats>,
    pub memory: Subsystem<MemoryStats>,
}

impl StatusSnapshot {
    /// Assemble a snapshot stamped with the time collection started; the
    /// overall flag stays false until [`evaluate`].
    ///
    /// [`evaluate`]: StatusSnapshot::evaluate
    pub fn new(
        timestamp: DateTime<Utc>,
        buffers: Subsystem<BufferStats>,
        disk: Subsystem<DiskStats>,
        memory: Subsystem<MemoryStats>,
    ) -> Self {
        Self {
            timestamp,
            healthy: false,
            policy: HealthPolicy::default(),
            buffers,
            disk,
            memory,
        }
    }

    /// Re-derive the memory flag from the reported percentage, overwriting
    /// whatever the probe decided. Returns the new flag.
    pub fn recheck_memory(&mut self, threshold: f64) -> bool {
        let healthy = self.memory.stats.percent_free >= threshold;
        if !healthy {
            tracing::warn!(
                "Free memory is {:.2}% (threshold {}%)",
                self.memory.stats.percent_free,
                threshold
            );
        }
        self.memory.stats.healthy = healthy;
        healthy
    }

    /// Final health decision: memory re-check, then the overall policy
    pub fn evaluate(&mut self, config: &ProbeConfig) {
        self.recheck_memory(config.memory_threshold);
        self.policy = config.health_policy;
        self.healthy = match config.health_policy {
            HealthPolicy::All => {
                self.buffers.stats.healthy && self.disk.stats.healthy && self.memory.stats.healthy
            }
            HealthPolicy::Memory => self.memory.stats.healthy,
        };
    }

    /// Names of the subsystems whose probe failed
    pub fn failed_subsystems(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.buffers.is_ok() {
            failed.push("buffers");
        }
        if !self.disk.is_ok() {
            failed.push("disk");
        }
        if !self.memory.is_ok() {
            failed.push("memory");
        }
        failed
    }

    pub fn all_failed(&self) -> bool {
        self.failed_subsystems().len() == 3
    }
}
