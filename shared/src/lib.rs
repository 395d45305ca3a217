#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod capabilities;
pub mod composer;
pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod message;
pub mod mirror;
pub mod model;
pub mod sync;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind, ErrorSeverity};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub const MAX_DISPLAY_NAME_CHARS: usize = 64;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Map preview span for location messages.
pub const LATITUDE_DELTA: f64 = 0.0922;
pub const LONGITUDE_DELTA: f64 = 0.0421;
