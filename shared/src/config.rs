use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{KvError, KvKey};

pub const DEFAULT_COLLECTION: &str = "messages";
pub const DEFAULT_MIRROR_KEY: &str = "messages";
pub const DEFAULT_IMAGE_PREFIX: &str = "images";
pub const DEFAULT_OFFLINE_NOTICE: &str = "You are offline, please check your network connection.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} cannot contain whitespace or '/': {value:?}")]
    InvalidName { field: &'static str, value: String },

    #[error("{field} is not a usable storage key: {source}")]
    InvalidKey {
        field: &'static str,
        #[source]
        source: KvError,
    },
}

/// Backend addressing shared by every capability request the core issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub collection: String,
    pub mirror_key: String,
    pub image_prefix: String,
    pub offline_notice: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            mirror_key: DEFAULT_MIRROR_KEY.to_string(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            offline_notice: DEFAULT_OFFLINE_NOTICE.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check_name("collection", &self.collection)?;
        Self::check_name("mirror_key", &self.mirror_key)?;
        KvKey::new(self.mirror_key.as_str()).map_err(|source| ConfigError::InvalidKey {
            field: "mirror_key",
            source,
        })?;
        Self::check_name("image_prefix", &self.image_prefix)?;
        if self.offline_notice.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "offline_notice",
            });
        }
        Ok(())
    }

    fn check_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
        if value.is_empty() {
            return Err(ConfigError::Empty { field });
        }
        if value.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ConfigError::InvalidName {
                field,
                value: value.to_string(),
            });
        }
        Ok(())
    }
}
