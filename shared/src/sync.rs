//! Connectivity-driven sync.
//!
//! While the chat is mounted the controller is either `Live` (one open
//! subscription to the remote message stream) or `Offline` (reading the
//! local mirror). Every reachability change is fed to
//! [`SyncController::on_connectivity`], which returns the side effects the
//! app has to carry out, in order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for one remote subscription. Ids are never reused within a
/// session, so snapshots from a closed subscription can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Chat not mounted, or mounted without any connectivity signal yet.
    #[default]
    Idle,
    Live {
        subscription: SubscriptionId,
    },
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Unsubscribe(SubscriptionId),
    Subscribe(SubscriptionId),
    AnnounceOffline,
    LoadMirror,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncController {
    mode: SyncMode,
    next_subscription: u64,
}

impl SyncController {
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        matches!(self.mode, SyncMode::Live { .. })
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.mode, SyncMode::Offline)
    }

    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        match self.mode {
            SyncMode::Live { subscription } => Some(subscription),
            SyncMode::Idle | SyncMode::Offline => None,
        }
    }

    /// Whether a snapshot tagged with `subscription` may touch the list.
    pub fn accepts(&self, subscription: SubscriptionId) -> bool {
        self.active_subscription() == Some(subscription)
    }

    pub fn on_connectivity(&mut self, online: bool) -> Vec<SyncAction> {
        match (self.mode, online) {
            (SyncMode::Live { .. }, true) | (SyncMode::Offline, false) => Vec::new(),
            (_, true) => {
                let mut actions = self.close();
                let subscription = self.allocate();
                self.mode = SyncMode::Live { subscription };
                tracing::info!(%subscription, "sync entering live mode");
                actions.push(SyncAction::Subscribe(subscription));
                actions
            }
            (_, false) => {
                let mut actions = self.close();
                self.mode = SyncMode::Offline;
                tracing::info!("sync entering offline mode");
                actions.push(SyncAction::AnnounceOffline);
                actions.push(SyncAction::LoadMirror);
                actions
            }
        }
    }

    /// Releases everything held for the mounted chat.
    pub fn release(&mut self) -> Vec<SyncAction> {
        let actions = self.close();
        self.mode = SyncMode::Idle;
        actions
    }

    fn close(&mut self) -> Vec<SyncAction> {
        match self.mode {
            SyncMode::Live { subscription } => {
                self.mode = SyncMode::Idle;
                vec![SyncAction::Unsubscribe(subscription)]
            }
            SyncMode::Idle | SyncMode::Offline => Vec::new(),
        }
    }

    fn allocate(&mut self) -> SubscriptionId {
        self.next_subscription = self.next_subscription.wrapping_add(1);
        SubscriptionId(self.next_subscription)
    }
}
