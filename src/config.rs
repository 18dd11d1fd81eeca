//! Webhook configuration
//!
//! The toleration list is built once at startup and injected into the
//! mutation decider as an immutable value; request handling only ever reads
//! it, so concurrent handlers never contend on it.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::pod::{TaintEffect, Toleration, TolerationOperator};

/// Taint key of the default toleration
pub const DEFAULT_TOLERATION_KEY: &str = "cloud.google.com/alloydb-host";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Immutable mutation configuration: the tolerations to enforce, in the
/// order they are appended
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Tolerations appended to every admitted pod
    pub tolerations: Vec<Toleration>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            tolerations: vec![Toleration {
                key: DEFAULT_TOLERATION_KEY.to_string(),
                operator: TolerationOperator::Exists,
                value: None,
                effect: Some(TaintEffect::NoSchedule),
            }],
        }
    }
}

impl MutationConfig {
    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}
