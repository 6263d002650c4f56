use serde::{Deserialize, Serialize};

/// Limits applied to caller-supplied names and identities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Maximum length in bytes of an identity placed in a reader list.
    pub max_identity_len: usize,
    /// Maximum length in bytes of an object name.
    pub max_name_len: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            max_identity_len: 64,
            max_name_len: 255,
        }
    }
}
