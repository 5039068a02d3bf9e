//! vigil.toml configuration parser.
//!
//! A verification run is configured by one TOML file: the service base
//! URL, the polling constraints, and one `[[targets]]` table per
//! endpoint. Structural validation (non-empty targets, positive attempt
//! budget, unique paths) happens here; URL validation happens where the
//! URL is parsed for probing.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ProbeTarget;

/// Top-level vigil.toml model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub targets: Vec<ProbeTarget>,
}

/// The service under verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL every target path is resolved against.
    pub base_url: String,
}

/// Polling constraints for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of rounds before giving up.
    pub max_attempts: u32,
    /// Sleep between rounds, in seconds. Zero means back-to-back rounds.
    pub interval_secs: u64,
    /// Per-probe timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval_secs: 10,
            timeout_secs: 5,
        }
    }
}

impl VerifyConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VerifyConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Fail-fast structural checks, run before any polling begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if self.poll.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.path.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.path.clone()));
            }
        }
        Ok(())
    }

    /// Scaffold a starter vigil.toml for the given service.
    pub fn scaffold(base_url: &str) -> Self {
        VerifyConfig {
            service: ServiceConfig {
                base_url: base_url.to_string(),
            },
            poll: PollConfig::default(),
            targets: vec![
                ProbeTarget::bare("/healthz"),
                ProbeTarget {
                    path: "/".to_string(),
                    placeholder_markers: vec!["placeholder".to_string()],
                    production_markers: Vec::new(),
                },
            ],
        }
    }
}
