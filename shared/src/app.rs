use tracing::{debug, error, info, warn};

use crate::capabilities::{
    kv, AuthResult, CameraOutput, CameraResult, Capabilities, ImageSource, KvKey, KvResult,
    LocalImage, LocationOutput, LocationResult, MessageQuery, StorageResult, StoreOutput,
    StoreResult,
};
use crate::composer::{self, ComposeError};
use crate::error::{AppError, ErrorKind};
use crate::event::Event;
use crate::message::{
    Author, Coordinate, Message, MessageDocument, MessageId, UnixTimeMs, UserId, OFFLINE_NOTICE_ID,
};
use crate::mirror;
use crate::model::{Model, Screen, Session};
use crate::sync::{SubscriptionId, SyncAction};
use crate::view::{self, ViewModel};
use crate::{MAX_DISPLAY_NAME_CHARS, MAX_IMAGE_BYTES};

#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), "update");

        match event {
            Event::Configure(config) => {
                if model.screen != Screen::Start || model.session.is_some() {
                    warn!("configuration ignored while a chat is mounted");
                    return;
                }
                match config.validate() {
                    Ok(()) => {
                        info!(collection = %config.collection, "configuration applied");
                        model.config = *config;
                    }
                    Err(e) => warn!(error = %e, "invalid configuration ignored"),
                }
            }

            Event::ConnectivityChanged { online } => {
                model.connectivity = Some(online);
                if model.screen.chat_mounted() && model.session.is_some() {
                    let actions = model.sync.on_connectivity(online);
                    Self::run_sync_actions(actions, model, caps);
                }
                caps.render.render();
            }

            Event::NameChanged { name } => {
                model.display_name = name.chars().take(MAX_DISPLAY_NAME_CHARS).collect();
                caps.render.render();
            }

            Event::ColorSelected { color } => {
                model.selected_color = color;
                caps.render.render();
            }

            Event::StartChatting => {
                if model.signing_in || model.screen != Screen::Start {
                    debug!("sign-in already in flight or chat mounted");
                    return;
                }
                model.signing_in = true;
                caps.auth
                    .sign_in_anonymously(|result| Event::SignedIn(Box::new(result)));
                caps.render.render();
            }

            Event::SignedIn(result) => {
                Self::on_signed_in(*result, model);
                caps.render.render();
                if model.session.is_some() {
                    Self::mount_chat(model, caps);
                }
            }

            Event::LeaveChat => {
                if !model.screen.chat_mounted() {
                    return;
                }
                let actions = model.sync.release();
                Self::run_sync_actions(actions, model, caps);
                model.conversation.clear();
                model.session = None;
                model.screen = Screen::Start;
                info!("chat unmounted");
                caps.render.render();
            }

            Event::SnapshotReceived {
                subscription,
                result,
            } => {
                Self::on_snapshot(subscription, *result, model, caps);
            }

            Event::MirrorLoaded(result) => {
                Self::on_mirror_loaded(*result, model);
                caps.render.render();
            }

            Event::MirrorSaved(result) => match *result {
                Ok(_) => debug!("mirror written"),
                Err(e) => warn!(error = %e, "failed to write mirror"),
            },

            Event::SendText { text } => {
                let Some(author) = Self::sending_author(model) else {
                    return;
                };
                let id = composer::generate_message_id(&model.conversation);
                match composer::compose_text(id, author, &text, UnixTimeMs::now()) {
                    Ok(message) => Self::submit(&message, model, caps),
                    Err(ComposeError::EmptyText) => debug!("blank text not sent"),
                    Err(e) => warn!(error = %e, "text not sent"),
                }
            }

            Event::ShareLocation => {
                if Self::sending_author(model).is_none() {
                    return;
                }
                caps.location
                    .request_permission(|result| Event::LocationPermission(Box::new(result)));
            }

            Event::LocationPermission(result) => {
                if model.author().is_none() {
                    return;
                }
                Self::on_location_permission(*result, model, caps);
            }

            Event::PositionReceived(result) => {
                Self::on_position(*result, model, caps);
            }

            Event::PickImage => Self::request_image(ImageSource::Library, model, caps),
            Event::TakePhoto => Self::request_image(ImageSource::Camera, model, caps),

            Event::ImagePermission { source, result } => {
                if model.author().is_none() {
                    return;
                }
                Self::on_image_permission(source, *result, model, caps);
            }

            Event::ImageAcquired { source, result } => {
                if model.author().is_none() {
                    return;
                }
                Self::on_image_acquired(source, *result, model, caps);
            }

            Event::ImageUploaded { message_id, result } => {
                Self::on_image_uploaded(message_id, *result, model, caps);
            }

            Event::MessageStored(result) => match *result {
                Ok(StoreOutput::Added { id }) => debug!(%id, "message stored"),
                Ok(other) => warn!(?other, "unexpected store output for add"),
                Err(e) => warn!(error = %e, "message not stored"),
            },

            Event::OpenImage { url } => {
                if model.screen.chat_mounted() {
                    model.screen = Screen::ImageView { url };
                    caps.render.render();
                }
            }

            Event::CloseImage => {
                if matches!(model.screen, Screen::ImageView { .. }) {
                    model.screen = Screen::Chat;
                    caps.render.render();
                }
            }

            Event::DismissAlert => {
                model.alert = None;
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::view(model)
    }
}

impl App {
    fn on_signed_in(result: AuthResult, model: &mut Model) {
        model.signing_in = false;
        match result {
            Ok(output) => {
                if model.screen != Screen::Start {
                    return;
                }
                let name = model.display_name.trim().to_string();
                info!(user_id = %output.user_id, "signed in anonymously");
                model.session = Some(Session {
                    author: Author::new(UserId::new(output.user_id), name),
                    background: model.selected_color,
                });
                model.screen = Screen::Chat;
            }
            Err(e) => {
                error!(error = %e, "anonymous sign-in failed");
                model.raise(
                    AppError::new(ErrorKind::Authentication, "Sign-in failed")
                        .with_internal(e.to_string()),
                );
            }
        }
    }

    /// Enters the sync controller with the last known connectivity signal.
    /// Without one, the first `ConnectivityChanged` does it.
    fn mount_chat(model: &mut Model, caps: &Capabilities) {
        if let Some(online) = model.connectivity {
            let actions = model.sync.on_connectivity(online);
            Self::run_sync_actions(actions, model, caps);
            caps.render.render();
        }
    }

    fn run_sync_actions(actions: Vec<SyncAction>, model: &mut Model, caps: &Capabilities) {
        for action in actions {
            match action {
                SyncAction::Unsubscribe(subscription) => caps.store.unsubscribe(subscription),
                SyncAction::Subscribe(subscription) => caps.store.subscribe(
                    subscription,
                    MessageQuery::newest_first(model.config.collection.clone()),
                    move |result| Event::SnapshotReceived {
                        subscription,
                        result: Box::new(result),
                    },
                ),
                SyncAction::AnnounceOffline => Self::announce_offline(model),
                SyncAction::LoadMirror => match KvKey::new(model.config.mirror_key.clone()) {
                    Ok(key) => kv::read(&caps.kv, &key, |result| {
                        Event::MirrorLoaded(Box::new(result))
                    }),
                    Err(e) => warn!(error = %e, "mirror not loaded"),
                },
            }
        }
    }

    fn announce_offline(model: &mut Model) {
        model.conversation.announce(Message::system_notice(
            OFFLINE_NOTICE_ID,
            model.config.offline_notice.clone(),
            UnixTimeMs::now(),
        ));
    }

    fn on_snapshot(
        subscription: SubscriptionId,
        result: StoreResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        if !model.sync.accepts(subscription) {
            debug!(%subscription, "dropping snapshot from inactive subscription");
            return;
        }
        let documents = match result {
            Ok(StoreOutput::Snapshot { documents }) => documents,
            Ok(other) => {
                warn!(?other, "unexpected store output for subscription");
                return;
            }
            Err(e) => {
                warn!(%subscription, error = %e, "subscription failed");
                return;
            }
        };

        let messages: Vec<Message> = documents
            .into_iter()
            .filter_map(|document| match document.into_message() {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!(error = %e, "skipping malformed document");
                    None
                }
            })
            .collect();
        debug!(%subscription, count = messages.len(), "snapshot applied");
        model.conversation.replace(messages);
        caps.render.render();

        Self::save_mirror(model, caps);
    }

    fn save_mirror(model: &Model, caps: &Capabilities) {
        let key = match KvKey::new(model.config.mirror_key.clone()) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "mirror not written");
                return;
            }
        };
        let bytes = match mirror::encode(model.conversation.persistable()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to encode mirror");
                return;
            }
        };
        if let Err(e) = kv::write(&caps.kv, &key, bytes, |result| {
            Event::MirrorSaved(Box::new(result))
        }) {
            warn!(error = %e, "mirror not written");
        }
    }

    fn on_mirror_loaded(result: KvResult, model: &mut Model) {
        if !model.sync.is_offline() {
            debug!("mirror read arrived after leaving offline mode");
            return;
        }
        match result {
            Ok(Some(bytes)) => match mirror::decode(&bytes) {
                Ok(messages) => {
                    debug!(count = messages.len(), "mirror loaded");
                    model.conversation.replace(messages);
                    Self::announce_offline(model);
                }
                Err(e) => warn!(error = %e, "mirror unreadable"),
            },
            Ok(None) => debug!("no mirror stored yet"),
            Err(e) => warn!(error = %e, "failed to read mirror"),
        }
    }

    /// Author for a new outgoing message. Sends are only accepted while live.
    fn sending_author(model: &Model) -> Option<Author> {
        let author = model.author()?.clone();
        if !model.sync.is_live() {
            warn!("send ignored while offline");
            return None;
        }
        Some(author)
    }

    fn submit(message: &Message, model: &Model, caps: &Capabilities) {
        debug!(id = %message.id, "submitting message");
        caps.store.add(
            model.config.collection.clone(),
            MessageDocument::from(message),
            |result| Event::MessageStored(Box::new(result)),
        );
    }

    fn on_location_permission(result: LocationResult, model: &mut Model, caps: &Capabilities) {
        match result {
            Ok(LocationOutput::Permission(status)) if status.is_granted() => {
                caps.location
                    .current_position(|result| Event::PositionReceived(Box::new(result)));
            }
            Ok(LocationOutput::Permission(status)) => {
                info!(?status, "location permission not granted");
                model.raise(AppError::new(
                    ErrorKind::LocationPermissionDenied,
                    "Location permission denied",
                ));
                caps.render.render();
            }
            Ok(other) => warn!(?other, "unexpected location output for permission"),
            Err(e) => {
                warn!(error = %e, "location permission request failed");
                model.raise(
                    AppError::new(ErrorKind::Location, "Location unavailable")
                        .with_internal(e.to_string()),
                );
                caps.render.render();
            }
        }
    }

    fn on_position(result: LocationResult, model: &mut Model, caps: &Capabilities) {
        let Some(author) = model.author().cloned() else {
            return;
        };
        let coordinate = match result {
            Ok(LocationOutput::Position {
                latitude,
                longitude,
            }) => Coordinate::new(latitude, longitude).map_err(|e| e.to_string()),
            Ok(other) => Err(format!("unexpected location output {other:?}")),
            Err(e) => Err(e.to_string()),
        };

        match coordinate {
            Ok(location) => {
                let id = composer::generate_message_id(&model.conversation);
                let message = composer::compose_location(id, author, location, UnixTimeMs::now());
                Self::submit(&message, model, caps);
            }
            Err(reason) => {
                warn!(%reason, "location not sent");
                model.raise(
                    AppError::new(ErrorKind::Location, "Location unavailable")
                        .with_internal(reason),
                );
                caps.render.render();
            }
        }
    }

    fn request_image(source: ImageSource, model: &Model, caps: &Capabilities) {
        if Self::sending_author(model).is_none() {
            return;
        }
        caps.camera.request_permission(source, move |result| Event::ImagePermission {
            source,
            result: Box::new(result),
        });
    }

    fn on_image_permission(
        source: ImageSource,
        result: CameraResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        match result {
            Ok(CameraOutput::Permission(status)) if status.is_granted() => {
                caps.camera.acquire(source, move |result| Event::ImageAcquired {
                    source,
                    result: Box::new(result),
                });
            }
            Ok(CameraOutput::Permission(status)) => {
                info!(?source, ?status, "image permission not granted");
                let kind = match source {
                    ImageSource::Library => ErrorKind::PhotoLibraryPermissionDenied,
                    ImageSource::Camera => ErrorKind::CameraPermissionDenied,
                };
                let prompt = status.should_show_settings_prompt();
                model.raise(
                    AppError::new(kind, "Permission denied")
                        .with_context("settings_prompt", prompt.to_string()),
                );
                caps.render.render();
            }
            Ok(other) => warn!(?other, "unexpected camera output for permission"),
            Err(e) => Self::raise_camera_error(&e.to_string(), model, caps),
        }
    }

    fn on_image_acquired(
        source: ImageSource,
        result: CameraResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        match result {
            Ok(CameraOutput::Acquired(image)) => Self::upload_image(image, model, caps),
            Ok(CameraOutput::Cancelled) => debug!(?source, "image selection cancelled"),
            Ok(other) => warn!(?other, "unexpected camera output for acquire"),
            Err(e) => Self::raise_camera_error(&e.to_string(), model, caps),
        }
    }

    fn upload_image(image: LocalImage, model: &mut Model, caps: &Capabilities) {
        if image.size_bytes > MAX_IMAGE_BYTES {
            warn!(size = image.size_bytes, "image exceeds upload limit");
            model.raise(
                AppError::new(ErrorKind::ImageTooLarge, "Image too large")
                    .with_context("size_bytes", image.size_bytes.to_string()),
            );
            caps.render.render();
            return;
        }

        let message_id = composer::generate_message_id(&model.conversation);
        let key = composer::image_object_key(&model.config.image_prefix, &message_id);
        debug!(%key, "uploading image");
        caps.storage.upload(key, image, move |result| Event::ImageUploaded {
            message_id,
            result: Box::new(result),
        });
    }

    fn on_image_uploaded(
        message_id: MessageId,
        result: StorageResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(author) = model.author().cloned() else {
            debug!(%message_id, "upload finished after the chat was left");
            return;
        };
        let composed = result
            .map_err(|e| e.to_string())
            .and_then(|output| {
                composer::compose_image(
                    message_id.clone(),
                    author,
                    &output.download_url,
                    UnixTimeMs::now(),
                )
                .map_err(|e| e.to_string())
            });

        match composed {
            Ok(message) => Self::submit(&message, model, caps),
            Err(reason) => {
                warn!(%message_id, %reason, "image not sent");
                model.raise(
                    AppError::new(ErrorKind::Upload, "Upload failed").with_internal(reason),
                );
                caps.render.render();
            }
        }
    }

    fn raise_camera_error(reason: &str, model: &mut Model, caps: &Capabilities) {
        warn!(%reason, "image acquisition failed");
        model.raise(AppError::new(ErrorKind::Camera, "Image unavailable").with_internal(reason));
        caps.render.render();
    }
}
