//! Orchestrator configuration
//!
//! Every setting can be given as a command-line flag or an environment
//! variable; defaults suit a local single-node deployment.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

/// Orchestrator configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "nova-orchestrator", version, about = "Durable single-node job queue")]
pub struct Config {
    /// Path of the SQLite database file
    #[arg(long, env = "ORCHESTRATOR_DB_PATH", default_value = ".data/jobs.sqlite3")]
    pub database_path: PathBuf,

    /// Address the HTTP server binds to
    #[arg(long, env = "ORCHESTRATOR_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Do not start the background poller; jobs then only run via `POST /worker/tick`
    #[arg(
        long,
        env = "ORCHESTRATOR_DISABLE_WORKER",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub disable_worker: bool,

    /// Delay between poller iterations, in milliseconds
    #[arg(long, env = "ORCHESTRATOR_POLL_INTERVAL_MS", default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// How long shutdown waits for the poller to stop, in seconds
    #[arg(long, env = "ORCHESTRATOR_SHUTDOWN_TIMEOUT_SECS", default_value_t = 2)]
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Configuration with defaults for the given database file
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            bind_addr: "0.0.0.0:8080".to_string(),
            disable_worker: false,
            poll_interval_ms: 500,
            shutdown_timeout_secs: 2,
        }
    }

    pub fn worker_enabled(&self) -> bool {
        !self.disable_worker
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database_path.as_os_str().is_empty() {
            anyhow::bail!("database_path cannot be empty");
        }

        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".data/jobs.sqlite3")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database_path, PathBuf::from(".data/jobs.sqlite3"));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(2));
        assert!(config.worker_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "nova-orchestrator",
            "--database-path",
            "/tmp/jobs.db",
            "--disable-worker",
            "--poll-interval-ms",
            "50",
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/jobs.db"));
        assert!(!config.worker_enabled());
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_disable_worker_from_env() {
        // SAFETY: the only other parse in this module passes --disable-worker explicitly
        unsafe { std::env::set_var("ORCHESTRATOR_DISABLE_WORKER", "1") };
        let disabled = Config::try_parse_from(["nova-orchestrator"]);

        unsafe { std::env::set_var("ORCHESTRATOR_DISABLE_WORKER", "0") };
        let enabled = Config::try_parse_from(["nova-orchestrator"]);

        unsafe { std::env::remove_var("ORCHESTRATOR_DISABLE_WORKER") };

        assert!(!disabled.unwrap().worker_enabled());
        assert!(enabled.unwrap().worker_enabled());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config.poll_interval_ms = 500;
        config.database_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
