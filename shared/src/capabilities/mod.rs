mod auth;
mod camera;
pub mod kv;
mod location;
mod storage;
mod store;

pub use self::auth::{Auth, AuthError, AuthOperation, AuthOutput, AuthResult};
pub use self::camera::{
    Camera, CameraError, CameraOperation, CameraOutput, CameraResult, ImageSource, LocalImage,
    PermissionStatus,
};
pub use self::kv::{KvError, KvKey, KvResult};
pub use self::location::{
    Location, LocationError, LocationOperation, LocationOutput, LocationResult,
};
pub use self::storage::{Storage, StorageError, StorageOperation, StorageResult, UploadOutput};
pub use self::store::{MessageQuery, Store, StoreError, StoreOperation, StoreOutput, StoreResult};

pub use crux_core::render::Render;
pub use crux_kv::error::KeyValueError;
pub use crux_kv::{KeyValue, KeyValueOperation};

#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub store: Store<Event>,
    pub storage: Storage<Event>,
    pub kv: KeyValue<Event>,
    pub auth: Auth<Event>,
    pub location: Location<Event>,
    pub camera: Camera<Event>,
}
