//! Codec for the on-device mirror of the last live snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::Message;

const CURRENT_SCHEMA_VERSION: u32 = 1;
const MAX_MIRROR_BYTES: usize = 16 * 1024 * 1024;
const MIRROR_MAGIC: &[u8; 4] = b"TKMR";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MirrorError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted mirror: {reason}")]
    Corrupted { reason: &'static str },

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityCheckFailed { expected: String, actual: String },

    #[error("schema version {found} is newer than supported {max}")]
    FutureSchema { found: u32, max: u32 },

    #[error("mirror too large: {size} bytes, max {max}")]
    TooLarge { size: usize, max: usize },
}

impl From<ciborium::de::Error<std::io::Error>> for MirrorError {
    fn from(e: ciborium::de::Error<std::io::Error>) -> Self {
        MirrorError::Serialization(e.to_string())
    }
}

impl From<ciborium::ser::Error<std::io::Error>> for MirrorError {
    fn from(e: ciborium::ser::Error<std::io::Error>) -> Self {
        MirrorError::Serialization(e.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct MirrorEnvelope {
    magic: [u8; 4],
    schema_version: u32,
    checksum: [u8; 32],
    payload: Vec<u8>,
}

/// Encodes the persistable messages. System notices never reach the mirror.
pub fn encode<'a, I>(messages: I) -> Result<Vec<u8>, MirrorError>
where
    I: IntoIterator<Item = &'a Message>,
{
    let messages: Vec<&Message> = messages.into_iter().filter(|m| !m.system).collect();

    let mut payload = Vec::new();
    ciborium::into_writer(&messages, &mut payload)?;

    let envelope = MirrorEnvelope {
        magic: *MIRROR_MAGIC,
        schema_version: CURRENT_SCHEMA_VERSION,
        checksum: *blake3::hash(&payload).as_bytes(),
        payload,
    };

    let mut bytes = Vec::new();
    ciborium::into_writer(&envelope, &mut bytes)?;
    if bytes.len() > MAX_MIRROR_BYTES {
        return Err(MirrorError::TooLarge {
            size: bytes.len(),
            max: MAX_MIRROR_BYTES,
        });
    }
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Message>, MirrorError> {
    if bytes.is_empty() {
        return Err(MirrorError::Corrupted {
            reason: "empty value",
        });
    }
    if bytes.len() > MAX_MIRROR_BYTES {
        return Err(MirrorError::TooLarge {
            size: bytes.len(),
            max: MAX_MIRROR_BYTES,
        });
    }

    let envelope: MirrorEnvelope = ciborium::from_reader(bytes)?;

    if envelope.magic != *MIRROR_MAGIC {
        return Err(MirrorError::Corrupted {
            reason: "invalid magic bytes",
        });
    }
    if envelope.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(MirrorError::FutureSchema {
            found: envelope.schema_version,
            max: CURRENT_SCHEMA_VERSION,
        });
    }

    let actual = blake3::hash(&envelope.payload);
    if actual.as_bytes() != &envelope.checksum {
        return Err(MirrorError::IntegrityCheckFailed {
            expected: blake3::Hash::from(envelope.checksum).to_hex().to_string(),
            actual: actual.to_hex().to_string(),
        });
    }

    Ok(ciborium::from_reader(envelope.payload.as_slice())?)
}
