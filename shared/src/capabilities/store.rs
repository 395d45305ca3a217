//! Remote message store: an append-only collection with an ordered live
//! query. The shell maps these operations onto the backend SDK.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::{MessageDocument, RemoteDocument};
use crate::sync::SubscriptionId;

pub const ORDER_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageQuery {
    pub collection: String,
    pub order_by: String,
    pub descending: bool,
}

impl MessageQuery {
    /// Newest first by creation time.
    pub fn newest_first(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            order_by: ORDER_FIELD.to_string(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StoreOperation {
    /// Streams one `Snapshot` per backend emission until unsubscribed.
    Subscribe {
        subscription: SubscriptionId,
        query: MessageQuery,
    },
    Unsubscribe {
        subscription: SubscriptionId,
    },
    Add {
        collection: String,
        document: MessageDocument,
    },
}

impl Operation for StoreOperation {
    type Output = StoreResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StoreOutput {
    Snapshot { documents: Vec<RemoteDocument> },
    Added { id: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreError {
    #[error("backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("permission denied by backend rules")]
    PermissionDenied,

    #[error("query rejected: {message}")]
    InvalidQuery { message: String },

    #[error("unknown error: {message}")]
    Unknown { message: String },
}

pub type StoreResult = Result<StoreOutput, StoreError>;

pub struct Store<Ev> {
    context: CapabilityContext<StoreOperation, Ev>,
}

impl<Ev> Capability<Ev> for Store<Ev> {
    type Operation = StoreOperation;
    type MappedSelf<MappedEv> = Store<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Store::new(self.context.map_event(f))
    }
}

impl<Ev> Store<Ev> {
    pub fn new(context: CapabilityContext<StoreOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Store<Ev>
where
    Ev: Send + 'static,
{
    /// Opens a live query. `make_event` runs once per emitted snapshot.
    pub fn subscribe<F>(&self, subscription: SubscriptionId, query: MessageQuery, make_event: F)
    where
        F: Fn(StoreResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut snapshots =
                context.stream_from_shell(StoreOperation::Subscribe { subscription, query });
            while let Some(result) = snapshots.next().await {
                context.update_app(make_event(result));
            }
        });
    }

    /// The shell must end the snapshot stream it opened for `subscription`.
    pub fn unsubscribe(&self, subscription: SubscriptionId) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(StoreOperation::Unsubscribe { subscription })
                .await;
        });
    }

    pub fn add<F>(&self, collection: impl Into<String>, document: MessageDocument, make_event: F)
    where
        F: FnOnce(StoreResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        let operation = StoreOperation::Add {
            collection: collection.into(),
            document,
        };
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}
