use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::message::{Content, Message};
use crate::model::{BackgroundColor, Model, Screen};
use crate::{LATITUDE_DELTA, LONGITUDE_DELTA};

pub const APP_TITLE: &str = "Talk with everyone";
pub const NAME_PLACEHOLDER: &str = "Enter your name";
pub const OWN_BUBBLE_COLOR: &str = "#000";
pub const OTHER_BUBBLE_COLOR: &str = "#fff";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub alert: Option<AlertView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenView {
    Start {
        title: String,
        name: String,
        name_placeholder: String,
        colors: Vec<ColorOption>,
        signing_in: bool,
    },
    Chat(ChatView),
    ImageView {
        url: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ColorOption {
    pub color: BackgroundColor,
    pub hex: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatView {
    pub title: String,
    pub background: String,
    pub online: bool,
    /// Text field and action button; hidden while offline.
    pub input_visible: bool,
    pub messages: Vec<MessageView>,
    pub actions: Vec<ComposerAction>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageView {
    pub id: String,
    pub text: String,
    pub created_at_ms: u64,
    pub author_id: String,
    pub author_name: String,
    pub is_own: bool,
    pub system: bool,
    pub bubble_color: String,
    pub attachment: Option<AttachmentView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttachmentView {
    Map {
        latitude: f64,
        longitude: f64,
        latitude_delta: f64,
        longitude_delta: f64,
    },
    Image {
        url: String,
    },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ComposerAction {
    ChooseFromLibrary,
    TakePicture,
    SendLocation,
    Cancel,
}

impl ComposerAction {
    pub const ALL: [Self; 4] = [
        Self::ChooseFromLibrary,
        Self::TakePicture,
        Self::SendLocation,
        Self::Cancel,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ChooseFromLibrary => "Choose From Library",
            Self::TakePicture => "Take Picture",
            Self::SendLocation => "Send Location",
            Self::Cancel => "Cancel",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AlertView {
    pub title: String,
    pub message: String,
    pub code: String,
}

impl From<&AppError> for AlertView {
    fn from(e: &AppError) -> Self {
        Self {
            title: e.title().to_string(),
            message: e.user_facing_message(),
            code: e.code().to_string(),
        }
    }
}

pub fn view(model: &Model) -> ViewModel {
    let screen = match &model.screen {
        Screen::Start => ScreenView::Start {
            title: APP_TITLE.to_string(),
            name: model.display_name.clone(),
            name_placeholder: NAME_PLACEHOLDER.to_string(),
            colors: BackgroundColor::ALL
                .iter()
                .map(|&color| ColorOption {
                    color,
                    hex: color.hex().to_string(),
                    selected: color == model.selected_color,
                })
                .collect(),
            signing_in: model.signing_in,
        },
        Screen::Chat => ScreenView::Chat(chat_view(model)),
        Screen::ImageView { url } => ScreenView::ImageView { url: url.clone() },
    };

    ViewModel {
        screen,
        alert: model.alert.as_ref().map(AlertView::from),
    }
}

fn chat_view(model: &Model) -> ChatView {
    let (title, background, own_id) = match &model.session {
        Some(session) => (
            session.author.name.clone(),
            session.background.hex(),
            Some(&session.author.id),
        ),
        None => (String::new(), BackgroundColor::default().hex(), None),
    };
    let live = model.sync.is_live();

    ChatView {
        title,
        background: background.to_string(),
        online: model.connectivity.unwrap_or(false),
        input_visible: live,
        messages: model
            .conversation
            .messages()
            .iter()
            .map(|m| message_view(m, own_id == Some(&m.author.id)))
            .collect(),
        actions: ComposerAction::ALL.to_vec(),
    }
}

fn message_view(message: &Message, is_own: bool) -> MessageView {
    let attachment = match &message.content {
        Content::Text { .. } => None,
        Content::Location { location } => Some(AttachmentView::Map {
            latitude: location.latitude(),
            longitude: location.longitude(),
            latitude_delta: LATITUDE_DELTA,
            longitude_delta: LONGITUDE_DELTA,
        }),
        Content::Image { url } => Some(AttachmentView::Image { url: url.clone() }),
    };

    MessageView {
        id: message.id.to_string(),
        text: message.text().to_string(),
        created_at_ms: message.created_at.as_millis(),
        author_id: message.author.id.to_string(),
        author_name: message.author.name.clone(),
        is_own,
        system: message.system,
        bubble_color: if is_own {
            OWN_BUBBLE_COLOR
        } else {
            OTHER_BUBBLE_COLOR
        }
        .to_string(),
        attachment,
    }
}
