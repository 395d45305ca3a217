use thiserror::Error;
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::message::{Author, Content, Coordinate, Message, MessageId, UnixTimeMs};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("message text is empty")]
    EmptyText,

    #[error("invalid image url {url:?}: {reason}")]
    InvalidImageUrl { url: String, reason: String },
}

/// Generates a message id that no visible message already uses.
pub fn generate_message_id(visible: &Conversation) -> MessageId {
    generate_message_id_with(visible, Uuid::new_v4)
}

pub fn generate_message_id_with<G>(visible: &Conversation, mut generate: G) -> MessageId
where
    G: FnMut() -> Uuid,
{
    loop {
        let id = MessageId::new(generate().to_string());
        if !visible.contains(&id) {
            return id;
        }
        tracing::debug!(%id, "generated message id collides with a visible message");
    }
}

/// Storage key for an image, shared with the id of the message that will
/// reference it.
pub fn image_object_key(prefix: &str, id: &MessageId) -> String {
    format!("{prefix}/{id}")
}

pub fn compose_text(
    id: MessageId,
    author: Author,
    text: &str,
    now: UnixTimeMs,
) -> Result<Message, ComposeError> {
    if text.trim().is_empty() {
        return Err(ComposeError::EmptyText);
    }
    Ok(Message {
        id,
        created_at: now,
        author,
        system: false,
        content: Content::Text {
            text: text.to_string(),
        },
    })
}

pub fn compose_location(
    id: MessageId,
    author: Author,
    location: Coordinate,
    now: UnixTimeMs,
) -> Message {
    Message {
        id,
        created_at: now,
        author,
        system: false,
        content: Content::Location { location },
    }
}

pub fn compose_image(
    id: MessageId,
    author: Author,
    download_url: &str,
    now: UnixTimeMs,
) -> Result<Message, ComposeError> {
    let parsed = url::Url::parse(download_url).map_err(|e| ComposeError::InvalidImageUrl {
        url: download_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(ComposeError::InvalidImageUrl {
            url: download_url.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(Message {
        id,
        created_at: now,
        author,
        system: false,
        content: Content::Image {
            url: download_url.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::UserId;

    fn author() -> Author {
        Author::new(UserId::new("u1"), "Ada")
    }

    #[test]
    fn regenerates_on_collision() {
        let taken = Uuid::from_u128(1);
        let fresh = Uuid::from_u128(2);
        let mut conversation = Conversation::default();
        conversation.replace(vec![compose_text(
            MessageId::new(taken.to_string()),
            author(),
            "hi",
            UnixTimeMs(1),
        )
        .unwrap()]);

        let mut script = vec![fresh, taken, taken].into_iter().rev();
        let mut calls = 0;
        let id = generate_message_id_with(&conversation, || {
            calls += 1;
            script.next().unwrap()
        });

        assert_eq!(id.as_str(), fresh.to_string());
        assert_eq!(calls, 3);
    }

    #[test]
    fn generated_ids_are_uuid_v4() {
        let id = generate_message_id(&Conversation::default());
        let parsed = Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            compose_text(MessageId::new("m"), author(), "  \n", UnixTimeMs(1)),
            Err(ComposeError::EmptyText)
        );
    }

    #[test]
    fn location_message_has_no_text_or_image() {
        let message = compose_location(
            MessageId::new("m"),
            author(),
            Coordinate::new(48.85, 2.35).unwrap(),
            UnixTimeMs(1),
        );
        assert_eq!(message.text(), "");
        assert!(message.image_url().is_none());
        assert!(message.location().is_some());
        assert!(!message.system);
    }

    #[test]
    fn image_message_keeps_download_url() {
        let url = "https://storage.example.com/v0/b/app/o/images%2Fm?alt=media";
        let message = compose_image(MessageId::new("m"), author(), url, UnixTimeMs(1)).unwrap();
        assert_eq!(message.image_url(), Some(url));
        assert_eq!(message.text(), "");
        assert!(message.location().is_none());
    }

    #[test]
    fn image_url_must_be_http() {
        assert!(matches!(
            compose_image(MessageId::new("m"), author(), "file:///tmp/a.jpg", UnixTimeMs(1)),
            Err(ComposeError::InvalidImageUrl { .. })
        ));
        assert!(matches!(
            compose_image(MessageId::new("m"), author(), "not a url", UnixTimeMs(1)),
            Err(ComposeError::InvalidImageUrl { .. })
        ));
    }

    #[test]
    fn object_key_uses_prefix() {
        assert_eq!(
            image_object_key("images", &MessageId::new("abc")),
            "images/abc"
        );
    }
}
