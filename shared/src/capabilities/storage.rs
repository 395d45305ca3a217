use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::camera::LocalImage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOperation {
    /// Uploads the file behind `image` under `key` and resolves a durable
    /// download URL once the upload has completed.
    Upload { key: String, image: LocalImage },
}

impl Operation for StorageOperation {
    type Output = StorageResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadOutput {
    pub download_url: String,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageError {
    #[error("local file unreadable: {uri}")]
    SourceUnreadable { uri: String },

    #[error("upload failed: {message}")]
    UploadFailed { message: String },

    #[error("upload quota exceeded")]
    QuotaExceeded,

    #[error("upload rejected by storage rules")]
    Unauthorized,

    #[error("download url unavailable for {key}")]
    UrlUnavailable { key: String },
}

pub type StorageResult = Result<UploadOutput, StorageError>;

pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Storage::new(self.context.map_event(f))
    }
}

impl<Ev> Storage<Ev> {
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Storage<Ev>
where
    Ev: Send + 'static,
{
    pub fn upload<F>(&self, key: impl Into<String>, image: LocalImage, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        let operation = StorageOperation::Upload {
            key: key.into(),
            image,
        };
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
