//! Status collector
//!
//! Runs the buffer-pool, disk and memory probes one after another and folds
//! their results into a [`StatusSnapshot`]. A failing probe never stops the
//! others; it is logged and reported in its own section.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::ProbeConfig;
use crate::probe::{buffers, disk, memory};
use crate::snapshot::{StatusSnapshot, Subsystem};
use crate::system::{CommandRunner, LocalRunner};

/// Builds a fresh snapshot per call. Holds no per-request state.
#[derive(Clone)]
pub struct StatusCollector {
    config: Arc<ProbeConfig>,
    runner: Arc<dyn CommandRunner>,
}

impl StatusCollector {
    /// Collector that spawns real processes with the configured deadline
    pub fn new(config: ProbeConfig) -> Self {
        let runner = LocalRunner::new(config.command_timeout());
        Self::with_runner(config, Arc::new(runner))
    }

    pub fn with_runner(config: ProbeConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Collect a snapshot stamped with the current time
    pub async fn collect(&self) -> StatusSnapshot {
        self.collect_at(Utc::now()).await
    }

    /// Collect a snapshot stamped with `started_at`, the moment the request
    /// began, rather than the moment the last probe returned
    pub async fn collect_at(&self, started_at: DateTime<Utc>) -> StatusSnapshot {
        let runner = self.runner.as_ref();
        let config = self.config.as_ref();

        let buffer_result = buffers::probe(runner, config).await;
        if let Err(e) = &buffer_result {
            tracing::warn!("Buffer probe failed: {}", e);
        }

        let disk_result = disk::probe(runner, config).await;
        if let Err(e) = &disk_result {
            tracing::warn!("Disk probe failed: {}", e);
        }

        let memory_result = memory::probe(runner, config).await;
        if let Err(e) = &memory_result {
            tracing::warn!("Memory probe failed: {}", e);
        }

        let mut snapshot = StatusSnapshot::new(
            started_at,
            Subsystem::from_result(&buffer_result),
            Subsystem::from_result(&disk_result),
            Subsystem::from_result(&memory_result),
        );
        snapshot.evaluate(config);

        tracing::debug!("Status at {}: {:?}", snapshot.timestamp, snapshot);
        snapshot
    }
}
