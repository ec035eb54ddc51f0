//! Log broadcast hub: job id → live subscriber connections.
//!
//! Decouples event producers (the job runner) from consumers (WebSocket
//! connections). Thread-safe via interior `RwLock`; all mutations of the
//! registry go through this type, never through ambient shared state.
//!
//! Delivery is best-effort: a subscriber whose channel has closed is
//! skipped. Skips are logged rather than silent so stale connections show
//! up when debugging, but they are never an error.

use std::collections::HashMap;

use fuzzhub_core::types::JobId;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::event::TerminalEvent;

/// Identifies one subscriber connection for the lifetime of its transport.
pub type SubscriberId = Uuid;

/// Channel sender half for pushing events to a subscriber connection.
pub type EventSender = mpsc::UnboundedSender<TerminalEvent>;

/// Fan-out registry mapping each job id to its current subscribers.
///
/// Designed to be wrapped in `Arc` and injected into both the job runner
/// (producer side) and the WebSocket layer (consumer side).
pub struct TerminalHub {
    subscribers: RwLock<HashMap<JobId, HashMap<SubscriberId, EventSender>>>,
}

impl TerminalHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register `subscriber` under `job_id` and acknowledge with a
    /// `subscribed` event sent to that connection alone.
    ///
    /// A connection follows at most one job at a time: subscribing to a new
    /// job id detaches it from the previous one. Re-subscribing to the same
    /// job id replaces the stored sender, so events are never delivered
    /// twice to one connection.
    pub async fn subscribe(&self, subscriber: SubscriberId, job_id: JobId, sender: EventSender) {
        let mut subs = self.subscribers.write().await;

        // Detach from any job this connection was following before.
        for set in subs.values_mut() {
            set.remove(&subscriber);
        }
        subs.retain(|_, set| !set.is_empty());

        subs.entry(job_id).or_default().insert(subscriber, sender.clone());

        // Ack while still holding the write lock: publishes take the read
        // lock, so nothing published to this job can precede the ack on the
        // new connection's channel. Other subscribers see nothing.
        let _ = sender.send(TerminalEvent::subscribed(job_id));
        drop(subs);

        tracing::debug!(subscriber = %subscriber, job_id, "Terminal subscription added");
    }

    /// Deliver `event` to every current subscriber of its job id, in
    /// publish order. Returns the number of connections it was sent to.
    ///
    /// Subscribers whose receiving half is gone are skipped; they are
    /// removed from the registry when their transport closes.
    pub async fn publish(&self, event: TerminalEvent) -> usize {
        let subs = self.subscribers.read().await;
        let Some(set) = subs.get(&event.job_id) else {
            tracing::trace!(job_id = event.job_id, kind = ?event.kind, "No subscribers for event");
            return 0;
        };

        let mut delivered = 0;
        for (subscriber, sender) in set {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(
                    subscriber = %subscriber,
                    job_id = event.job_id,
                    "Dropped event for closed subscriber channel"
                );
            }
        }
        delivered
    }

    /// Remove `subscriber` from every job's subscriber set. Invoked when
    /// its transport closes or errors.
    pub async fn unsubscribe(&self, subscriber: SubscriberId) {
        let mut subs = self.subscribers.write().await;
        for set in subs.values_mut() {
            set.remove(&subscriber);
        }
        subs.retain(|_, set| !set.is_empty());
        tracing::debug!(subscriber = %subscriber, "Terminal subscription removed");
    }

    /// Current number of subscribers for a job id.
    pub async fn subscriber_count(&self, job_id: JobId) -> usize {
        self.subscribers
            .read()
            .await
            .get(&job_id)
            .map_or(0, HashMap::len)
    }
}

impl Default for TerminalHub {
    fn default() -> Self {
        Self::new()
    }
}
