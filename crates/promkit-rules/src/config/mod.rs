//! Rules config loader (strict parsing).
//!
//! YAML by default; files ending in `.json` are parsed as JSON.

pub mod schema;

use std::fs;
use std::path::Path;

use promkit_core::error::{PromkitError, Result};

pub use schema::RulesConfig;

pub fn load_from_file(path: &Path) -> Result<RulesConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PromkitError::Config(format!("read {} failed: {e}", path.display())))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_from_json_str(&s)
    } else {
        load_from_str(&s)
    }
}

pub fn load_from_str(s: &str) -> Result<RulesConfig> {
    let cfg: RulesConfig =
        serde_yaml::from_str(s).map_err(|e| PromkitError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_json_str(s: &str) -> Result<RulesConfig> {
    let cfg: RulesConfig =
        serde_json::from_str(s).map_err(|e| PromkitError::Config(format!("invalid json: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
