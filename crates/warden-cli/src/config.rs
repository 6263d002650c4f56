use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use warden_access::AccessConfig;
use warden_store::StoreConfig;

/// Top-level configuration file.
///
/// ```toml
/// [store]
/// root = "/var/lib/warden"
/// fsync = true
///
/// [access]
/// max_identity_len = 64
/// max_name_len = 255
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub store: StoreConfig,
    pub access: AccessConfig,
}

impl WardenConfig {
    /// Load `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
