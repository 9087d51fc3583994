//! Memory-usage probe
//!
//! Runs `free` and reads the `Mem:` row. Only the positions of total, used,
//! free and buff/cache are interpreted:
//!
//! ```text
//!                total        used        free      shared  buff/cache   available
//! Mem:        16000000    14000000      500000       12000     1000000     1500000
//! ```

use serde::Serialize;

use super::parse_count;
use crate::config::ProbeConfig;
use crate::error::{ParseError, Result};
use crate::system::CommandRunner;

const ROW_LABEL: &str = "Mem:";
const MIN_FIELDS: usize = 6;

/// System memory summary, in KiB
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub cache: u64,
    pub percent_free: f64,
    pub healthy: bool,
}

impl MemoryStats {
    pub fn parse(output: &str) -> std::result::Result<Self, ParseError> {
        let row = output
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(ROW_LABEL))
            .ok_or(ParseError::MissingRow(ROW_LABEL))?;

        let fields: Vec<&str> = row.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Err(ParseError::FieldCount {
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }

        let mut stats = MemoryStats {
            total: parse_count("total", fields[1])?,
            used: parse_count("used", fields[2])?,
            free: parse_count("free", fields[3])?,
            cache: parse_count("cache", fields[5])?,
            ..Default::default()
        };

        if stats.total > 0 {
            stats.percent_free = stats.free as f64 / stats.total as f64 * 100.0;
        }

        Ok(stats)
    }

    /// Mark healthy when at least `threshold` percent of memory is free
    pub fn assess(mut self, threshold: f64) -> Self {
        self.healthy = self.percent_free >= threshold;
        self
    }
}

/// Run `free` and assess free memory
pub async fn probe(runner: &dyn CommandRunner, config: &ProbeConfig) -> Result<MemoryStats> {
    let output = runner.run(&config.free_program, &[]).await?;
    let stats = MemoryStats::parse(&output)?.assess(config.memory_threshold);

    tracing::debug!(
        "Memory: {} total, {} used, {} free, {} cache ({:.2}% free)",
        stats.total,
        stats.used,
        stats.free,
        stats.cache,
        stats.percent_free
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockRunner;

    const FREE_OUTPUT: &str = "\
               total        used        free      shared  buff/cache   available
Mem:        16000000    14000000      500000       12000     1000000     1500000
Swap:        2097148           0     2097148
";

    #[test]
    fn test_parse_free_output() {
        let stats = MemoryStats::parse(FREE_OUTPUT).unwrap().assess(20.0);
        assert_eq!(stats.total, 16000000);
        assert_eq!(stats.used, 14000000);
        assert_eq!(stats.free, 500000);
        assert_eq!(stats.cache, 1000000);
        assert!((stats.percent_free - 3.125).abs() < 1e-9);
        assert!(!stats.healthy);
    }

    #[test]
    fn test_shared_column_is_not_interpreted() {
        let stats = MemoryStats::parse("Mem: 16000000 14000000 500000 ... 1000000").unwrap();
        assert_eq!(stats.cache, 1000000);
        assert!((stats.percent_free - 3.125).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let stats = MemoryStats::parse("Mem: 100 80 20 0 0 20")
            .unwrap()
            .assess(20.0);
        assert!((stats.percent_free - 20.0).abs() < 1e-9);
        assert!(stats.healthy);

        let stats = MemoryStats::parse("Mem: 100 81 19 0 0 20")
            .unwrap()
            .assess(20.0);
        assert!(!stats.healthy);
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            MemoryStats::parse("Mem: 16000000 14000000"),
            Err(ParseError::FieldCount {
                expected: 6,
                found: 3
            })
        );
    }

    #[test]
    fn test_missing_row() {
        assert_eq!(
            MemoryStats::parse("Swap: 2097148 0 2097148"),
            Err(ParseError::MissingRow("Mem:"))
        );
        assert_eq!(MemoryStats::parse(""), Err(ParseError::MissingRow("Mem:")));
        // an unlabelled row is not taken as the memory row
        assert_eq!(
            MemoryStats::parse("16000000 14000000 500000 12000 1000000 1500000"),
            Err(ParseError::MissingRow("Mem:"))
        );
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let stats = MemoryStats::parse("Mem: 0 0 0 0 0 0").unwrap().assess(20.0);
        assert_eq!(stats.percent_free, 0.0);
        assert!(!stats.healthy);
    }

    #[tokio::test]
    async fn test_probe_runs_free() {
        let runner = MockRunner::new().with_stdout("free", FREE_OUTPUT);
        let stats = probe(&runner, &ProbeConfig::default()).await.unwrap();
        assert!(!stats.healthy);
        assert_eq!(runner.calls(), vec!["free".to_string()]);
    }
}
