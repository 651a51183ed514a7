//! In-process session change notifications.
//!
//! [`SessionEventBus`] fans out sign-in and sign-out events over a
//! `tokio::sync::broadcast` channel. The `/auth/events` SSE stream holds a
//! receiver for as long as the client is connected; dropping the stream
//! drops the receiver and releases the subscription.

use chrono::{DateTime, Utc};
use raze_core::types::DbId;
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn {
        identity_id: DbId,
        at: DateTime<Utc>,
    },
    SignedOut {
        identity_id: DbId,
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn signed_in(identity_id: DbId) -> Self {
        Self::SignedIn {
            identity_id,
            at: Utc::now(),
        }
    }

    pub fn signed_out(identity_id: DbId) -> Self {
        Self::SignedOut {
            identity_id,
            at: Utc::now(),
        }
    }

    pub fn identity_id(&self) -> DbId {
        match self {
            Self::SignedIn { identity_id, .. } | Self::SignedOut { identity_id, .. } => {
                *identity_id
            }
        }
    }

    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignedIn { .. } => "signed_in",
            Self::SignedOut { .. } => "signed_out",
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

pub struct SessionEventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer is full.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped when nobody listens.
    pub fn publish(&self, event: SessionEvent) {
        tracing::debug!(
            identity_id = event.identity_id(),
            event = event.name(),
            "Publishing session event"
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = SessionEventBus::default();
        let mut rx = bus.subscribe();
        bus.publish(SessionEvent::signed_in(7));
        let event = rx.recv().await.unwrap();
        assert_matches!(event, SessionEvent::SignedIn { identity_id: 7, .. });
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = SessionEventBus::default();
        bus.publish(SessionEvent::signed_out(1));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn dropping_receiver_releases_subscription() {
        let bus = SessionEventBus::default();
        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn event_wire_shape() {
        let json = serde_json::to_value(SessionEvent::signed_out(3)).unwrap();
        assert_eq!(json["type"], "signed_out");
        assert_eq!(json["identity_id"], 3);
    }
}
