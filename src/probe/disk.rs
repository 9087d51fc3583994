//! Disk-usage probe
//!
//! Runs `df -k <data_dir>` and reads the row for the filesystem holding the
//! database directory:
//!
//! ```text
//! Filesystem     1K-blocks    Used Available Use% Mounted on
//! /dev/sda1       10485760 1048576   9437184  10% /opt/virtuoso-opensource
//! ```

use serde::Serialize;

use super::parse_count;
use crate::config::ProbeConfig;
use crate::error::{ParseError, Result};
use crate::system::CommandRunner;

const MIN_FIELDS: usize = 4;

/// Usage of the filesystem holding the database directory, in KiB
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskStats {
    pub used: u64,
    pub free: u64,
    pub percent_used: f64,
    pub percent_free: f64,
    pub healthy: bool,
}

impl DiskStats {
    /// Parse `df -k` output, with or without its header row.
    ///
    /// Everything after the header is read as one field stream, so a row
    /// that `df` wrapped after a long filesystem name still parses. The
    /// third field is used KiB and the fourth available KiB.
    pub fn parse(output: &str) -> std::result::Result<Self, ParseError> {
        let fields: Vec<&str> = output
            .lines()
            .filter(|line| !line.trim_start().starts_with("Filesystem"))
            .flat_map(str::split_whitespace)
            .collect();
        if fields.len() < MIN_FIELDS {
            return Err(ParseError::FieldCount {
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }

        let used = parse_count("used", fields[2])?;
        let free = parse_count("available", fields[3])?;

        let mut stats = DiskStats {
            used,
            free,
            ..Default::default()
        };

        let capacity = used as f64 + free as f64;
        if capacity > 0.0 {
            stats.percent_used = used as f64 / capacity * 100.0;
            stats.percent_free = 100.0 - stats.percent_used;
        }

        Ok(stats)
    }

    /// Mark healthy when strictly more than `threshold` percent is free
    pub fn assess(mut self, threshold: f64) -> Self {
        self.healthy = self.percent_free > threshold;
        self
    }
}

pub fn command_args(config: &ProbeConfig) -> Vec<String> {
    vec!["-k".to_string(), config.data_dir.clone()]
}

/// Run `df` against the data directory and assess free space
pub async fn probe(runner: &dyn CommandRunner, config: &ProbeConfig) -> Result<DiskStats> {
    let output = runner.run(&config.df_program, &command_args(config)).await?;
    let stats = DiskStats::parse(&output)?.assess(config.disk_threshold);

    tracing::debug!(
        "Disk: {} KiB used, {} KiB free ({:.2}% free)",
        stats.used,
        stats.free,
        stats.percent_free
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockRunner;

    const DF_OUTPUT: &str = "\
Filesystem     1K-blocks    Used Available Use% Mounted on
/dev/sda1       10485760 1048576   9437184  10% /opt/virtuoso-opensource
";

    #[test]
    fn test_parse_with_header() {
        let stats = DiskStats::parse(DF_OUTPUT).unwrap().assess(20.0);
        assert_eq!(stats.used, 1048576);
        assert_eq!(stats.free, 9437184);
        assert!((stats.percent_used - 10.0).abs() < 1e-9);
        assert!((stats.percent_free - 90.0).abs() < 1e-9);
        assert!(stats.healthy);
    }

    #[test]
    fn test_parse_bare_row() {
        let stats =
            DiskStats::parse("/dev/sda1 10485760 1048576 9437184 10% /opt/virtuoso-opensource")
                .unwrap();
        assert_eq!(stats.used, 1048576);
        assert_eq!(stats.free, 9437184);
        assert!((stats.percent_free - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_wrapped_row() {
        let output = "\
Filesystem     1K-blocks    Used Available Use% Mounted on
/dev/mapper/vg_virtuoso-lv_data_long_name
                10485760 1048576   9437184  10% /opt/virtuoso-opensource
";
        let stats = DiskStats::parse(output).unwrap().assess(20.0);
        assert_eq!(stats.used, 1048576);
        assert_eq!(stats.free, 9437184);
        assert!((stats.percent_free - 90.0).abs() < 1e-9);
        assert!(stats.healthy);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // 80 used + 20 free: exactly 20% free is not enough
        let stats = DiskStats::parse("/dev/sda1 100 80 20 80% /data")
            .unwrap()
            .assess(20.0);
        assert!((stats.percent_free - 20.0).abs() < 1e-9);
        assert!(!stats.healthy);

        let stats = DiskStats::parse("/dev/sda1 100 79 21 79% /data")
            .unwrap()
            .assess(20.0);
        assert!(stats.healthy);
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            DiskStats::parse("/dev/sda1 10485760 1048576"),
            Err(ParseError::FieldCount {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            DiskStats::parse(""),
            Err(ParseError::FieldCount {
                expected: 4,
                found: 0
            })
        );
        // header only
        let header_only = "Filesystem 1K-blocks Used Available Use% Mounted on\n";
        assert!(DiskStats::parse(header_only).is_err());
    }

    #[test]
    fn test_non_numeric_field() {
        let err = DiskStats::parse("/dev/sda1 10485760 - 9437184 10% /data").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "used",
                value: "-".to_string()
            }
        );
    }

    #[test]
    fn test_empty_filesystem_does_not_divide() {
        let stats = DiskStats::parse("tmpfs 0 0 0 - /dev/shm").unwrap().assess(20.0);
        assert_eq!(stats.percent_used, 0.0);
        assert_eq!(stats.percent_free, 0.0);
        assert!(!stats.healthy);
    }

    #[tokio::test]
    async fn test_probe_runs_df() {
        let runner = MockRunner::new().with_stdout("df", DF_OUTPUT);
        let stats = probe(&runner, &ProbeConfig::default()).await.unwrap();
        assert!(stats.healthy);
        assert_eq!(
            command_args(&ProbeConfig::default()),
            vec!["-k", "/opt/virtuoso-opensource"]
        );
    }
}
