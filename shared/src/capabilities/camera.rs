use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Pick an existing photo from the device library.
    Library,
    /// Capture a new photo with the camera.
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    DeniedPermanently,
    Restricted,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }

    pub fn should_show_settings_prompt(&self) -> bool {
        matches!(
            self,
            PermissionStatus::DeniedPermanently | PermissionStatus::Restricted
        )
    }
}

/// Handle to an image the shell holds on disk. Bytes stay in the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalImage {
    pub uri: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraOperation {
    RequestPermission { source: ImageSource },
    Acquire { source: ImageSource },
}

impl Operation for CameraOperation {
    type Output = CameraResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraOutput {
    Permission(PermissionStatus),
    Acquired(LocalImage),
    /// The user backed out of the picker or camera.
    Cancelled,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraError {
    #[error("no camera available on this device")]
    Unavailable,

    #[error("capture failed: {reason}")]
    CaptureFailed { reason: String },

    #[error("unsupported image format: {mime_type}")]
    UnsupportedFormat { mime_type: String },
}

pub type CameraResult = Result<CameraOutput, CameraError>;

pub struct Camera<Ev> {
    context: CapabilityContext<CameraOperation, Ev>,
}

impl<Ev> Capability<Ev> for Camera<Ev> {
    type Operation = CameraOperation;
    type MappedSelf<MappedEv> = Camera<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Camera::new(self.context.map_event(f))
    }
}

impl<Ev> Camera<Ev> {
    pub fn new(context: CapabilityContext<CameraOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Camera<Ev>
where
    Ev: Send + 'static,
{
    pub fn request_permission<F>(&self, source: ImageSource, make_event: F)
    where
        F: FnOnce(CameraResult) -> Ev + Send + 'static,
    {
        self.request(CameraOperation::RequestPermission { source }, make_event);
    }

    pub fn acquire<F>(&self, source: ImageSource, make_event: F)
    where
        F: FnOnce(CameraResult) -> Ev + Send + 'static,
    {
        self.request(CameraOperation::Acquire { source }, make_event);
    }

    fn request<F>(&self, operation: CameraOperation, make_event: F)
    where
        F: FnOnce(CameraResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
