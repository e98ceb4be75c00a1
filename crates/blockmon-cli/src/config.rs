//! Monitor configuration

use crate::cli::Cli;
use blockmon_core::{
    EngineConfig, PredecessorPolicy, ReportFormat, TrackerConfig, WarmUpPolicy, ZeroCrankPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path:?}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config {path:?}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Report layout
    pub format: ReportFormat,
    /// Trailing window size
    pub window_capacity: usize,
    /// Rows between header reprints
    pub header_interval: usize,
    /// Zero crank handling
    pub zero_crank: ZeroCrankPolicy,
    /// Predecessor lookup rule
    pub predecessor: PredecessorPolicy,
    /// Warm-up rule
    pub warm_up: WarmUpPolicy,
    /// Reject unrecognized record types
    pub strict_types: bool,
    /// Follow-mode poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            format: engine.format,
            window_capacity: engine.tracker.window_capacity,
            header_interval: engine.header_interval,
            zero_crank: engine.tracker.zero_crank,
            predecessor: engine.tracker.predecessor,
            warm_up: engine.tracker.warm_up,
            strict_types: false,
            poll_interval_ms: 250,
        }
    }
}

impl MonitorConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".blockmon").join("config.toml"))
    }

    /// Load from `path`, or from the default location when it exists, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.strict {
            self.strict_types = true;
        }
    }

    /// Engine-facing subset
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tracker: TrackerConfig {
                window_capacity: self.window_capacity,
                zero_crank: self.zero_crank,
                predecessor: self.predecessor,
                warm_up: self.warm_up,
            },
            format: self.format,
            header_interval: self.header_interval,
        }
    }

    /// Follow-mode poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = MonitorConfig::default();
        assert_eq!(config.format, ReportFormat::A);
        assert_eq!(config.window_capacity, 20);
        assert_eq!(config.header_interval, 20);
        assert_eq!(config.zero_crank, ZeroCrankPolicy::TreatAsAbsent);
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            format = "b"
            window_capacity = 10
            zero_crank = "record"
            predecessor = "finalized-only"
            warm_up = "two-heights"
            poll_interval_ms = 1000
        "#;
        let config: MonitorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.format, ReportFormat::B);
        assert_eq!(config.window_capacity, 10);
        assert_eq!(config.header_interval, 20);
        assert_eq!(config.zero_crank, ZeroCrankPolicy::Record);
        assert_eq!(config.predecessor, PredecessorPolicy::FinalizedOnly);
        assert_eq!(config.warm_up, WarmUpPolicy::TwoHeights);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_serialize() {
        let toml = toml::to_string(&MonitorConfig::default()).unwrap();
        assert!(toml.contains("format = \"a\""));
        assert!(toml.contains("zero_crank = \"treat-as-absent\""));
        assert!(toml.contains("warm_up = \"any-prior-event\""));

        let config: MonitorConfig = toml::from_str("zero_crank = \"absent\"").unwrap();
        assert_eq!(config.zero_crank, ZeroCrankPolicy::TreatAsAbsent);
    }

    #[test]
    fn test_load_file_and_cli_override() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"format = \"b\"\nheader_interval = 5\n").unwrap();

        let mut config = MonitorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.format, ReportFormat::B);
        assert_eq!(config.header_interval, 5);

        let cli = Cli::parse_from(["blockmon", "--format", "a", "--strict"]);
        config.apply_cli(&cli);
        assert_eq!(config.format, ReportFormat::A);
        assert!(config.strict_types);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MonitorConfig::load(Some(Path::new("/nonexistent/blockmon.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"zero_crank = \"sometimes\"\n").unwrap();
        let err = MonitorConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
