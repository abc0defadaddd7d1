// Run configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SolverConfig;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Solver and logging settings, read from `shiftopt.toml`.
///
/// ```
/// use shiftopt::config::AppConfig;
///
/// let config = AppConfig::from_toml_str(r#"
///     [solver]
///     backend = "highs"
///     time_limit = 10.0
///     num_workers = 8
///
///     [logging]
///     filter = "shiftopt=debug"
/// "#).unwrap();
///
/// assert_eq!(config.solver.num_workers, Some(8));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or sets
    /// a non-positive time limit or worker count.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.solver.time_limit {
            if limit.is_nan() || limit <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "solver.time_limit must be positive, got {}",
                    limit
                )));
            }
        }
        if self.solver.num_workers == Some(0) {
            return Err(ConfigError::Invalid(
                "solver.num_workers must be at least 1".to_string(),
            ));
        }
        if let Some(gap) = self.solver.gap_tolerance {
            if !(0.0..=1.0).contains(&gap) {
                return Err(ConfigError::Invalid(format!(
                    "solver.gap_tolerance must lie in [0, 1], got {}",
                    gap
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SearchStrategy, SolverBackend};

    #[test]
    fn test_defaults_when_empty() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.solver.backend, SolverBackend::Auto);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_solver_section() {
        let config = AppConfig::from_toml_str(
            r#"
            [solver]
            backend = "coin_cbc"
            time_limit = 30.0
            num_workers = 4
            strategy = "portfolio"
            verbose = true
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.backend, SolverBackend::CoinCbc);
        assert_eq!(config.solver.time_limit, Some(30.0));
        assert_eq!(config.solver.strategy, SearchStrategy::Portfolio);
        assert!(config.solver.verbose);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_toml_str("[solver]\ntime_limit = 0.0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[solver]\nnum_workers = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[solver]\nbackend = \"gurobi\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::load("/nonexistent/shiftopt.toml"),
            Err(ConfigError::Io(_))
        ));
        assert_eq!(
            AppConfig::load_or_default("/nonexistent/shiftopt.toml").unwrap(),
            AppConfig::default()
        );
    }

    #[test]
    fn test_present_default_file_is_still_validated() {
        let path = std::env::temp_dir().join(format!("shiftopt-{}.toml", std::process::id()));
        std::fs::write(&path, "[solver]\nnum_workers = 0\n").unwrap();
        let result = AppConfig::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
