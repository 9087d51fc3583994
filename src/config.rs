/*!
 * Configuration types for the health probe
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// How the top-level `healthy` flag is derived from the subsystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthPolicy {
    /// Healthy only when buffers, disk and memory are all healthy
    #[default]
    All,

    /// Healthy when memory is healthy, regardless of the other subsystems
    Memory,
}

/// Targets, thresholds and listener settings for the status collector.
///
/// Every field defaults to the values the probe has always used, so an empty
/// TOML file yields the stock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port the HTTP listener binds to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route serving the status snapshot
    #[serde(default = "default_route")]
    pub route: String,

    /// Interactive SQL client used for the buffer-pool probe
    #[serde(default = "default_isql_program")]
    pub isql_program: String,

    /// Database endpoint passed to the SQL client
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_credential")]
    pub username: String,

    #[serde(default = "default_credential")]
    pub password: String,

    /// Script the SQL client runs to print the status report
    #[serde(default = "default_status_script")]
    pub status_script: String,

    /// Filesystem usage utility
    #[serde(default = "default_df_program")]
    pub df_program: String,

    /// Database directory whose filesystem is checked
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Memory summary utility
    #[serde(default = "default_free_program")]
    pub free_program: String,

    /// Minimum free buffer percentage (inclusive)
    #[serde(default = "default_threshold")]
    pub buffers_threshold: f64,

    /// Free disk percentage that must be exceeded (exclusive)
    #[serde(default = "default_threshold")]
    pub disk_threshold: f64,

    /// Minimum free memory percentage (inclusive)
    #[serde(default = "default_threshold")]
    pub memory_threshold: f64,

    /// Deadline for each external command
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// How the overall flag is derived
    #[serde(default)]
    pub health_policy: HealthPolicy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            route: default_route(),
            isql_program: default_isql_program(),
            endpoint: default_endpoint(),
            username: default_credential(),
            password: default_credential(),
            status_script: default_status_script(),
            df_program: default_df_program(),
            data_dir: default_data_dir(),
            free_program: default_free_program(),
            buffers_threshold: default_threshold(),
            disk_threshold: default_threshold(),
            memory_threshold: default_threshold(),
            command_timeout_secs: default_command_timeout(),
            health_policy: HealthPolicy::All,
        }
    }
}

// Default value functions for serde
fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_route() -> String {
    "/health".to_string()
}

fn default_isql_program() -> String {
    "isql".to_string()
}

fn default_endpoint() -> String {
    "0.0.0.0:1111".to_string()
}

fn default_credential() -> String {
    "dba".to_string()
}

fn default_status_script() -> String {
    "status.sql".to_string()
}

fn default_df_program() -> String {
    "df".to_string()
}

fn default_data_dir() -> String {
    "/opt/virtuoso-opensource".to_string()
}

fn default_free_program() -> String {
    "free".to_string()
}

fn default_threshold() -> f64 {
    20.0
}

fn default_command_timeout() -> u64 {
    10
}

impl ProbeConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ProbeConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the collector cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("buffers_threshold", self.buffers_threshold),
            ("disk_threshold", self.disk_threshold),
            ("memory_threshold", self.memory_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }

        if self.command_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "command_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !self.route.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "route must start with '/', got {:?}",
                self.route
            )));
        }

        for (name, program) in [
            ("isql_program", &self.isql_program),
            ("df_program", &self.df_program),
            ("free_program", &self.free_program),
        ] {
            if program.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Listener address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
