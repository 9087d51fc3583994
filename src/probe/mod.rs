//! Subsystem probes
//!
//! Each probe runs one external tool through a [`CommandRunner`], parses its
//! plain-text output into a typed stats value and applies its threshold:
//!
//! | Probe     | Tool                     | Healthy when               |
//! |-----------|--------------------------|----------------------------|
//! | `buffers` | `isql <endpoint> ...`    | `percent_free >= threshold` |
//! | `disk`    | `df -k <data_dir>`       | `percent_free > threshold`  |
//! | `memory`  | `free`                   | `percent_free >= threshold` |
//!
//! [`CommandRunner`]: crate::system::CommandRunner

pub mod buffers;
pub mod disk;
pub mod memory;

pub use buffers::BufferStats;
pub use disk::DiskStats;
pub use memory::MemoryStats;

use crate::error::ParseError;

/// Parse a non-negative integer field, naming the field on failure
fn parse_count(field: &'static str, value: &str) -> Result<u64, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
