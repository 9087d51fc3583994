/*!
 * virtuoso-health - HTTP health-check probe for a Virtuoso database host
 *
 * Per request, the collector:
 * - asks the database for its buffer-pool status through `isql`
 * - checks free space on the filesystem holding the database directory
 * - checks free system memory
 *
 * and serves the combined snapshot as JSON on a single GET route.
 */

pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod server;
pub mod snapshot;
pub mod system;

// Re-export commonly used types
pub use collector::StatusCollector;
pub use config::{HealthPolicy, ProbeConfig};
pub use error::{ConfigError, ParseError, ProbeError, Result};
pub use snapshot::{ProbeStatus, StatusSnapshot, Subsystem};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
