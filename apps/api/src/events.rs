//! # Change Feed
//!
//! In-process fan-out of "something changed" notifications. Handlers publish
//! after each successful write; `GET /api/events` streams them to signed-in
//! dashboards, which show them as toasts.
//!
//! ```text
//! ┌──────────────┐  publish   ┌───────────────────────┐  subscribe  ┌──────────┐
//! │ POST/PUT/DEL │──────────► │ broadcast::Sender     │───────────► │ SSE #1   │
//! │ handlers     │            │ (capacity 256)        │───────────► │ SSE #2   │
//! └──────────────┘            └───────────────────────┘             └──────────┘
//! ```
//!
//! Publishing never blocks and never fails a request: with no subscribers
//! the event is dropped, and a subscriber that falls more than the channel
//! capacity behind skips what it missed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events buffered per subscriber before it starts lagging.
const FEED_CAPACITY: usize = 256;

/// Which kind of record changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Category,
    Inventory,
    User,
}

/// What happened to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub resource: Resource,
    pub action: ChangeAction,
    /// Id of the changed record.
    pub id: String,
    /// Human-readable label, e.g. the category name or item code.
    pub summary: String,
    /// User who made the change.
    pub actor_id: String,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(
        resource: Resource,
        action: ChangeAction,
        id: impl Into<String>,
        summary: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Self {
        ChangeEvent {
            resource,
            action,
            id: id.into(),
            summary: summary.into(),
            actor_id: actor_id.into(),
            at: Utc::now(),
        }
    }
}

/// Shared handle to the change feed. Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        ChangeFeed { sender }
    }

    /// Sends `event` to every current subscriber.
    pub fn publish(&self, event: ChangeEvent) {
        tracing::debug!(
            resource = ?event.resource,
            action = ?event.action,
            id = %event.id,
            "Publishing change"
        );
        // Err only means nobody is listening.
        let _ = self.sender.send(event);
    }

    /// A receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
