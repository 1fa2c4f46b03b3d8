//! Configuration loading from disk.
//!
//! Pipeline: read file → TOML decode → validate → default substitution.
//! A decode failure is fatal and surfaces immediately; validation never runs
//! on a document that failed to decode. Validation failures come back as
//! data — the caller decides whether they end the process.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::Defaults;
use crate::config::schema::Config;
use crate::config::validation::Validator;
use crate::config::violation::Violation;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The source text is not a valid document. Validation did not run.
    #[error("failed to decode config: {0}")]
    Decode(#[from] toml::de::Error),

    /// The document decoded but broke validation rules.
    #[error("config failed validation with {} problem(s)", count_leaves(.0))]
    Invalid(Vec<Violation>),
}

fn count_leaves(violations: &[Violation]) -> usize {
    violations.iter().map(Violation::leaf_count).sum()
}

/// Load, validate, and default-substitute a configuration file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Decode and validate configuration text.
///
/// Recoverable root violations (missing title or port) are resolved in the
/// returned document rather than reported.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(text)?;

    let validator = Validator::default();
    let violations = validator.validate(&config);
    let remaining = Defaults::default().apply(&mut config, violations);

    if remaining.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Invalid(remaining))
    }
}
