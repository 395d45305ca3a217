#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use talk_core::capabilities::{
    AuthOutput, CameraOperation, KeyValueOperation, LocationOperation, StorageOperation, StoreOperation,
};
use talk_core::message::{DocumentUser, MessageDocument, RemoteDocument, RemoteTimestamp};
use talk_core::{App, Effect, Event, Model};

pub type Tester = AppTester<App, Effect>;

/// Signs in as "Ada" and mounts the chat with no connectivity signal yet.
pub fn mounted_chat() -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    app.update(
        Event::NameChanged {
            name: "Ada".into(),
        },
        &mut model,
    );
    app.update(Event::StartChatting, &mut model);
    app.update(
        Event::SignedIn(Box::new(Ok(AuthOutput {
            user_id: "uid-ada".into(),
        }))),
        &mut model,
    );
    (app, model)
}

/// Applies `event` and every event produced while handling it, returning all
/// effects in emission order.
pub fn drive(app: &Tester, event: Event, model: &mut Model) -> Vec<Effect> {
    let update = app.update(event, model);
    let mut effects = update.effects;
    for event in update.events {
        effects.extend(drive(app, event, model));
    }
    effects
}

pub fn feed(app: &Tester, events: Vec<Event>, model: &mut Model) -> Vec<Effect> {
    events
        .into_iter()
        .flat_map(|event| drive(app, event, model))
        .collect()
}

pub fn store_requests(effects: Vec<Effect>) -> Vec<Request<StoreOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Store(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn kv_requests(effects: Vec<Effect>) -> Vec<Request<KeyValueOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::KeyValue(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn location_request(effects: Vec<Effect>) -> Request<LocationOperation> {
    effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Location(request) => Some(request),
            _ => None,
        })
        .expect("a location request")
}

pub fn camera_request(effects: Vec<Effect>) -> Request<CameraOperation> {
    effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Camera(request) => Some(request),
            _ => None,
        })
        .expect("a camera request")
}

pub fn storage_requests(effects: Vec<Effect>) -> Vec<Request<StorageOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Storage(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn document(id: &str, text: &str, seconds: i64) -> RemoteDocument {
    RemoteDocument {
        id: id.to_string(),
        data: MessageDocument {
            id: format!("client-{id}"),
            text: text.to_string(),
            created_at: RemoteTimestamp {
                seconds,
                nanoseconds: 0,
            },
            user: DocumentUser {
                id: "uid-bob".into(),
                name: "Bob".into(),
            },
            system: false,
            location: None,
            image_url: None,
        },
    }
}
