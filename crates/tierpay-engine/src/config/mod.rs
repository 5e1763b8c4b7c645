//! Policy config loader (strict parsing).

pub mod schema;

use std::fs;

use tierpay_core::error::{Result, TierPayError};

pub use schema::{
    BonusSection, EngineSection, IssuanceSection, IssuanceTracking, PolicyConfig, ProjectSection,
    TierConfig,
};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TIERPAY_CONFIG";

/// Config path used when `TIERPAY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "tierpay.yaml";

pub fn load_from_file(path: &str) -> Result<PolicyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TierPayError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PolicyConfig> {
    let cfg: PolicyConfig = serde_yaml::from_str(s)
        .map_err(|e| TierPayError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
