//! Engine options (`sprocket.toml`)
//!
//! ```toml
//! mode = "compiled"
//! max_ticks = 500
//! max_call_depth = 64
//! ```

use super::error::RuntimeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Which back-end runs scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Tree-walking interpreter
    #[default]
    Interpreted,
    /// Lower to IR, generate ops, run as generators
    Compiled,
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interpreted" => Ok(ExecutionMode::Interpreted),
            "compiled" => Ok(ExecutionMode::Compiled),
            other => Err(format!(
                "unknown mode '{}' (expected 'interpreted' or 'compiled')",
                other
            )),
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Interpreted => f.write_str("interpreted"),
            ExecutionMode::Compiled => f.write_str("compiled"),
        }
    }
}

fn default_max_ticks() -> u64 {
    10_000
}

fn default_max_call_depth() -> usize {
    256
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineOptions {
    /// Back-end
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Tick budget for `run_until_idle`
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Deepest allowed procedure nesting
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            max_ticks: default_max_ticks(),
            max_call_depth: default_max_call_depth(),
        }
    }
}

impl EngineOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, RuntimeError> {
        Ok(toml::from_str(source)?)
    }

    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
