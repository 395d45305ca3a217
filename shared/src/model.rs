use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::conversation::Conversation;
use crate::error::AppError;
use crate::message::Author;
use crate::sync::SyncController;

/// Background colors offered on the start screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackgroundColor {
    Black,
    Plum,
    #[default]
    Slate,
    Sage,
}

impl BackgroundColor {
    pub const ALL: [Self; 4] = [Self::Black, Self::Plum, Self::Slate, Self::Sage];

    pub const fn hex(self) -> &'static str {
        match self {
            Self::Black => "#090C08",
            Self::Plum => "#474056",
            Self::Slate => "#8A95A5",
            Self::Sage => "#B9C6AE",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Start,
    Chat,
    /// Full-screen image opened from the chat; the chat stays mounted below.
    ImageView { url: String },
}

impl Screen {
    pub fn chat_mounted(&self) -> bool {
        matches!(self, Self::Chat | Self::ImageView { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub author: Author,
    pub background: BackgroundColor,
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: ChatConfig,
    pub screen: Screen,

    // Start screen
    pub display_name: String,
    pub selected_color: BackgroundColor,
    pub signing_in: bool,

    pub session: Option<Session>,

    /// Last reachability signal from the shell; `None` until the first one.
    pub connectivity: Option<bool>,
    pub sync: SyncController,
    pub conversation: Conversation,

    pub alert: Option<AppError>,
}

impl Model {
    pub fn raise(&mut self, error: AppError) {
        self.alert = Some(error);
    }

    /// Author of outgoing messages, if a chat session is mounted.
    pub fn author(&self) -> Option<&Author> {
        if !self.screen.chat_mounted() {
            return None;
        }
        self.session.as_ref().map(|s| &s.author)
    }
}
