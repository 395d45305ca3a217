//! On-device persistence through `crux_kv`, with key and size checks
//! applied before a request reaches the shell.

use crux_kv::error::KeyValueError;
use crux_kv::KeyValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_VALUE_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KvKey(String);

impl KvKey {
    pub fn new(key: impl Into<String>) -> Result<Self, KvError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(key: &str) -> Result<(), KvError> {
        if key.trim().is_empty() {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(KvError::InvalidKey {
                key: key.chars().take(50).collect::<String>() + "...",
                reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
            });
        }

        if key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot contain path traversal sequences".to_string(),
            });
        }

        if key.chars().any(char::is_control) {
            return Err(KvError::InvalidKey {
                key: key.escape_default().to_string(),
                reason: "key contains control characters".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },
}

/// What the shell answers for a read or a write: the stored value, or the
/// value a write replaced.
pub type KvResult = Result<Option<Vec<u8>>, KeyValueError>;

pub fn read<Ev, F>(kv: &KeyValue<Ev>, key: &KvKey, make_event: F)
where
    Ev: Send + 'static,
    F: FnOnce(KvResult) -> Ev + Send + Sync + 'static,
{
    kv.get(key.as_str().to_string(), make_event);
}

/// Overwrites `key`. Oversized values never reach the shell.
pub fn write<Ev, F>(
    kv: &KeyValue<Ev>,
    key: &KvKey,
    value: Vec<u8>,
    make_event: F,
) -> Result<(), KvError>
where
    Ev: Send + 'static,
    F: FnOnce(KvResult) -> Ev + Send + Sync + 'static,
{
    check_value_size(value.len())?;
    kv.set(key.as_str().to_string(), value, make_event);
    Ok(())
}

fn check_value_size(size: usize) -> Result<(), KvError> {
    if size > MAX_VALUE_SIZE {
        return Err(KvError::ValueTooLarge {
            size,
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(())
}
