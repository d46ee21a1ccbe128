use serde::Deserialize;
use promkit_core::error::{PromkitError, Result};

use crate::model::AlertRuleGroup;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    pub version: u32,

    /// Application prefix applied to metric names and (title-cased) alert names.
    #[serde(default)]
    pub metric_prefix: String,

    pub group: AlertRuleGroup,
}

impl RulesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromkitError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if self.group.name.trim().is_empty() {
            return Err(PromkitError::Config("group.name must not be empty".into()));
        }
        for (i, rule) in self.group.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(PromkitError::Config(format!(
                    "group.rules[{i}].name must not be empty"
                )));
            }
            if rule.rule.trim().is_empty() {
                return Err(PromkitError::Config(format!(
                    "group.rules[{i}].rule must not be empty ({})",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}
