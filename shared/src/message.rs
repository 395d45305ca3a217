use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Id of the synthetic notice shown while the device is offline.
pub const OFFLINE_NOTICE_ID: &str = "system-offline";

const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_SEC: u32 = 1_000_000_000;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(MessageId);
typed_id!(UserId);

// --- Time ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or(0),
        )
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

/// Timestamp as the backend stores it: whole seconds plus a nanosecond part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTimestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl RemoteTimestamp {
    pub fn to_unix_ms(self) -> Result<UnixTimeMs, DocumentError> {
        if self.nanoseconds >= NANOS_PER_SEC {
            return Err(DocumentError::InvalidTimestamp {
                seconds: self.seconds,
                nanoseconds: self.nanoseconds,
            });
        }
        if self.seconds < 0 {
            return Ok(UnixTimeMs(0));
        }
        let millis = self
            .seconds
            .unsigned_abs()
            .saturating_mul(1000)
            .saturating_add(u64::from(self.nanoseconds / NANOS_PER_MILLI));
        Ok(UnixTimeMs(millis))
    }
}

impl From<UnixTimeMs> for RemoteTimestamp {
    fn from(t: UnixTimeMs) -> Self {
        let millis = t.as_millis();
        Self {
            seconds: i64::try_from(millis / 1000).unwrap_or(i64::MAX),
            // < 1000 * 1_000_000, always fits
            nanoseconds: u32::try_from(millis % 1000).unwrap_or(0) * NANOS_PER_MILLI,
        }
    }
}

// --- Coordinate: validated, NaN-safe ---

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid coordinate: latitude={0}, longitude={1}")]
    InvalidCoordinate(f64, f64),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(ValidationError::InvalidCoordinate(latitude, longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

// --- Domain message ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
}

impl Author {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Author attached to synthetic notices.
    pub fn system() -> Self {
        Self::new(UserId::new("0"), "")
    }
}

/// What a message carries. A message is exactly one of these, so a location
/// and an image can never travel together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
    Location { location: Coordinate },
    Image { url: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub created_at: UnixTimeMs,
    pub author: Author,
    #[serde(default)]
    pub system: bool,
    pub content: Content,
}

impl Message {
    pub fn system_notice(id: impl Into<String>, text: impl Into<String>, at: UnixTimeMs) -> Self {
        Self {
            id: MessageId::new(id),
            created_at: at,
            author: Author::system(),
            system: true,
            content: Content::Text { text: text.into() },
        }
    }

    /// Text body; empty for location and image messages.
    pub fn text(&self) -> &str {
        match &self.content {
            Content::Text { text } => text,
            Content::Location { .. } | Content::Image { .. } => "",
        }
    }

    pub fn location(&self) -> Option<Coordinate> {
        match &self.content {
            Content::Location { location } => Some(*location),
            _ => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.content {
            Content::Image { url } => Some(url),
            _ => None,
        }
    }
}

// --- Backend document form ---

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DocumentError {
    #[error("document {id} carries both a location and an image")]
    ConflictingPayloads { id: String },

    #[error("document {id} has neither text nor payload")]
    Empty { id: String },

    #[error("document {id}: {source}")]
    InvalidLocation {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("invalid timestamp: {seconds}s {nanoseconds}ns")]
    InvalidTimestamp { seconds: i64, nanoseconds: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub created_at: RemoteTimestamp,
    pub user: DocumentUser,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DocumentLocation>,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Message> for MessageDocument {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            text: message.text().to_string(),
            created_at: message.created_at.into(),
            user: DocumentUser {
                id: message.author.id.to_string(),
                name: message.author.name.clone(),
            },
            system: message.system,
            location: message.location().map(|c| DocumentLocation {
                latitude: c.latitude(),
                longitude: c.longitude(),
            }),
            image_url: message.image_url().map(str::to_string),
        }
    }
}

/// A stored document together with the id the backend assigned to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub id: String,
    pub data: MessageDocument,
}

impl RemoteDocument {
    pub fn into_message(self) -> Result<Message, DocumentError> {
        let Self { id, data } = self;
        let created_at = data.created_at.to_unix_ms()?;
        let has_text = !data.text.is_empty();

        let content = match (data.location, data.image_url) {
            (Some(_), Some(_)) => return Err(DocumentError::ConflictingPayloads { id }),
            (Some(loc), None) => match Coordinate::new(loc.latitude, loc.longitude) {
                Ok(location) => Content::Location { location },
                Err(source) => return Err(DocumentError::InvalidLocation { id, source }),
            },
            (None, Some(url)) if !url.is_empty() => Content::Image { url },
            _ if data.text.is_empty() => return Err(DocumentError::Empty { id }),
            _ => Content::Text { text: data.text },
        };
        if has_text && !matches!(content, Content::Text { .. }) {
            debug!(%id, "discarding text on payload document");
        }

        Ok(Message {
            id: MessageId::new(id),
            created_at,
            author: Author::new(UserId::new(data.user.id), data.user.name),
            system: data.system,
            content,
        })
    }
}
