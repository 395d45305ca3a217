use serde::{Deserialize, Serialize};

use crate::capabilities::{
    AuthResult, CameraResult, ImageSource, KvResult, LocationResult, StorageResult, StoreResult,
};
use crate::config::ChatConfig;
use crate::message::MessageId;
use crate::model::BackgroundColor;
use crate::sync::SubscriptionId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Shell
    Configure(Box<ChatConfig>),
    ConnectivityChanged {
        online: bool,
    },

    // Start screen
    NameChanged {
        name: String,
    },
    ColorSelected {
        color: BackgroundColor,
    },
    StartChatting,

    // Chat screen
    LeaveChat,
    SendText {
        text: String,
    },
    ShareLocation,
    PickImage,
    TakePhoto,
    OpenImage {
        url: String,
    },
    CloseImage,
    DismissAlert,

    // Capability responses (boxed to keep enum size small)
    #[serde(skip)]
    SignedIn(Box<AuthResult>),
    #[serde(skip)]
    SnapshotReceived {
        subscription: SubscriptionId,
        result: Box<StoreResult>,
    },
    #[serde(skip)]
    MessageStored(Box<StoreResult>),
    #[serde(skip)]
    MirrorLoaded(Box<KvResult>),
    #[serde(skip)]
    MirrorSaved(Box<KvResult>),
    #[serde(skip)]
    LocationPermission(Box<LocationResult>),
    #[serde(skip)]
    PositionReceived(Box<LocationResult>),
    #[serde(skip)]
    ImagePermission {
        source: ImageSource,
        result: Box<CameraResult>,
    },
    #[serde(skip)]
    ImageAcquired {
        source: ImageSource,
        result: Box<CameraResult>,
    },
    #[serde(skip)]
    ImageUploaded {
        message_id: MessageId,
        result: Box<StorageResult>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::ConnectivityChanged { .. } => "connectivity_changed",
            Self::NameChanged { .. } => "name_changed",
            Self::ColorSelected { .. } => "color_selected",
            Self::StartChatting => "start_chatting",
            Self::LeaveChat => "leave_chat",
            Self::SendText { .. } => "send_text",
            Self::ShareLocation => "share_location",
            Self::PickImage => "pick_image",
            Self::TakePhoto => "take_photo",
            Self::OpenImage { .. } => "open_image",
            Self::CloseImage => "close_image",
            Self::DismissAlert => "dismiss_alert",
            Self::SignedIn(_) => "signed_in",
            Self::SnapshotReceived { .. } => "snapshot_received",
            Self::MessageStored(_) => "message_stored",
            Self::MirrorLoaded(_) => "mirror_loaded",
            Self::MirrorSaved(_) => "mirror_saved",
            Self::LocationPermission(_) => "location_permission",
            Self::PositionReceived(_) => "position_received",
            Self::ImagePermission { .. } => "image_permission",
            Self::ImageAcquired { .. } => "image_acquired",
            Self::ImageUploaded { .. } => "image_uploaded",
        }
    }
}
