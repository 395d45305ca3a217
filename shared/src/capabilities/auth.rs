use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOperation {
    SignInAnonymously,
}

impl Operation for AuthOperation {
    type Output = AuthResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOutput {
    pub user_id: String,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthError {
    #[error("anonymous sign-in is disabled for this project")]
    Disabled,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("unknown error: {message}")]
    Unknown { message: String },
}

pub type AuthResult = Result<AuthOutput, AuthError>;

/// Session-scoped anonymous identity. There is no sign-out.
pub struct Auth<Ev> {
    context: CapabilityContext<AuthOperation, Ev>,
}

impl<Ev> Capability<Ev> for Auth<Ev> {
    type Operation = AuthOperation;
    type MappedSelf<MappedEv> = Auth<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Auth::new(self.context.map_event(f))
    }
}

impl<Ev> Auth<Ev> {
    pub fn new(context: CapabilityContext<AuthOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Auth<Ev>
where
    Ev: Send + 'static,
{
    pub fn sign_in_anonymously<F>(&self, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(AuthOperation::SignInAnonymously)
                .await;
            context.update_app(make_event(result));
        });
    }
}
