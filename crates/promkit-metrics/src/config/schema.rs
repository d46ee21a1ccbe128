use std::collections::HashMap;

use serde::Deserialize;
use promkit_core::error::{PromkitError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    pub version: u32,

    /// Application prefix; normalized before use.
    #[serde(default)]
    pub prefix: String,

    /// Help text keyed by raw (unprefixed) metric name.
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromkitError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if let Some((name, _)) = self.descriptions.iter().find(|(_, d)| d.trim().is_empty()) {
            return Err(PromkitError::Config(format!(
                "descriptions.{name} must not be empty"
            )));
        }
        Ok(())
    }
}
