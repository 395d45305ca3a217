use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::MAX_IMAGE_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Authentication,
    Upload,
    ImageTooLarge,
    Camera,
    CameraPermissionDenied,
    PhotoLibraryPermissionDenied,
    Location,
    LocationPermissionDenied,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Authentication => "AUTH_ERROR",
            Self::Upload => "UPLOAD_ERROR",
            Self::ImageTooLarge => "IMAGE_TOO_LARGE",
            Self::Camera => "CAMERA_ERROR",
            Self::CameraPermissionDenied => "CAMERA_PERMISSION_DENIED",
            Self::PhotoLibraryPermissionDenied => "PHOTO_LIBRARY_PERMISSION_DENIED",
            Self::Location => "LOCATION_ERROR",
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Upload
            | Self::Camera
            | Self::Location
            | Self::Authentication => ErrorSeverity::Transient,

            Self::ImageTooLarge
            | Self::CameraPermissionDenied
            | Self::PhotoLibraryPermissionDenied
            | Self::LocationPermissionDenied => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_permission_denial(self) -> bool {
        matches!(
            self,
            Self::CameraPermissionDenied
                | Self::PhotoLibraryPermissionDenied
                | Self::LocationPermissionDenied
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.kind.is_permission_denial() {
            "Permission required"
        } else {
            "Something went wrong"
        }
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Authentication => "Unable to start a chat session. Please try again.".into(),
            ErrorKind::Upload => "The image could not be uploaded. Please try again.".into(),
            ErrorKind::ImageTooLarge => format!(
                "The image is too large. Please use an image smaller than {} MB.",
                MAX_IMAGE_BYTES / (1024 * 1024)
            ),
            ErrorKind::Camera => "Unable to get an image. Please try again.".into(),
            ErrorKind::CameraPermissionDenied => {
                "Camera access is required. Please enable camera permissions in Settings.".into()
            }
            ErrorKind::PhotoLibraryPermissionDenied => {
                "Photo library access is required. Please enable it in Settings.".into()
            }
            ErrorKind::Location => "Error occurred while fetching location".into(),
            ErrorKind::LocationPermissionDenied => "Permissions haven't been granted.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
