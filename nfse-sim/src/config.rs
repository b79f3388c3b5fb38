//! Optional TOML configuration for the simulator.
//!
//! ```toml
//! log_level = "debug"
//! default_iss_rate = 2.5
//! default_withholdings = ["iss", "ir", "pis", "cofins", "csll"]
//! ```
//!
//! Every key is optional; command-line flags take precedence.

use std::path::{Path, PathBuf};

use nfse_core::{IssRate, WithholdingFlags, WithholdingKind};
use serde::{Deserialize, Serialize};

/// Errors raised while reading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// ISS rate used when `--iss-rate` is omitted.
    pub default_iss_rate: IssRate,
    /// Taxes withheld when `simulate` is given no `--withhold`.
    pub default_withholdings: Vec<WithholdingKind>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_iss_rate: IssRate::default(),
            default_withholdings: Vec::new(),
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads `path`, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn default_flags(&self) -> WithholdingFlags {
        self.default_withholdings.iter().copied().collect()
    }
}
