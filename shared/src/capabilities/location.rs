use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::camera::PermissionStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationOperation {
    /// Foreground location permission.
    RequestPermission,
    CurrentPosition,
}

impl Operation for LocationOperation {
    type Output = LocationResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LocationOutput {
    Permission(PermissionStatus),
    Position { latitude: f64, longitude: f64 },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationError {
    #[error("location services are disabled")]
    ServicesDisabled,

    #[error("position unavailable: {message}")]
    Unavailable { message: String },

    #[error("location request timed out")]
    Timeout,
}

pub type LocationResult = Result<LocationOutput, LocationError>;

pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<Ev> Location<Ev> {
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Location<Ev>
where
    Ev: Send + 'static,
{
    pub fn request_permission<F>(&self, make_event: F)
    where
        F: FnOnce(LocationResult) -> Ev + Send + 'static,
    {
        self.request(LocationOperation::RequestPermission, make_event);
    }

    pub fn current_position<F>(&self, make_event: F)
    where
        F: FnOnce(LocationResult) -> Ev + Send + 'static,
    {
        self.request(LocationOperation::CurrentPosition, make_event);
    }

    fn request<F>(&self, operation: LocationOperation, make_event: F)
    where
        F: FnOnce(LocationResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
