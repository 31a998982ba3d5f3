// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel broadcasting lifecycle events to connected observers.

use relay_core::{LiveEvent, LiveEventType};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Per-subscriber bounded buffer; a subscriber whose buffer overflows (too
/// slow to drain) is dropped rather than stalling the producer (§4.6, §9).
const SUBSCRIBER_BUFFER: usize = 256;

struct Subscriber {
    id: u64,
    tx: mpsc::Sender<LiveEvent>,
}

/// Maintains the subscriber set and broadcasts `LiveEvent`s. Construct one
/// per `Core`; `subscribe` is how the WS handler enrolls a new connection.
pub struct LiveFeed {
    subscribers: parking_lot::Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl LiveFeed {
    pub fn new() -> Self {
        LiveFeed {
            subscribers: parking_lot::Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Enrolls a new subscriber and immediately sends it an `init` event
    /// with the given snapshot payload.
    pub fn subscribe(&self, init_snapshot: Value) -> mpsc::Receiver<LiveEvent> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let init_event = LiveEvent::new(LiveEventType::Init, init_snapshot);
        let _ = tx.try_send(init_event);
        self.subscribers.lock().push(Subscriber { id, tx });
        rx
    }

    /// Builds the event once and attempts to send to every subscriber.
    /// Subscribers whose buffer is full (or whose receiver is gone) are
    /// dropped.
    pub fn broadcast(&self, event_type: LiveEventType, data: Value) {
        let event = LiveEvent::new(event_type, data);
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|s| s.tx.try_send(event.clone()).is_ok());
    }

    pub fn unsubscribe(&self, id: u64) {
        self.subscribers.lock().retain(|s| s.id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedLiveFeed = Arc<LiveFeed>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribe_receives_init_event_first() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe(json!({"agents": [], "tasks": []}));
        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, LiveEventType::Init);
    }

    #[tokio::test]
    async fn broadcast_delivers_in_order_to_one_subscriber() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe(json!({}));
        let _ = rx.recv().await; // drain init

        feed.broadcast(LiveEventType::TaskCreate, json!({"id": "1"}));
        feed.broadcast(LiveEventType::TaskDispatch, json!({"id": "1"}));
        feed.broadcast(LiveEventType::TaskComplete, json!({"id": "1"}));

        let a = rx.recv().await.unwrap();
        let b = rx.recv().await.unwrap();
        let c = rx.recv().await.unwrap();
        assert_eq!(a.event_type, LiveEventType::TaskCreate);
        assert_eq!(b.event_type, LiveEventType::TaskDispatch);
        assert_eq!(c.event_type, LiveEventType::TaskComplete);
    }

    #[tokio::test]
    async fn slow_subscriber_is_dropped_on_overflow() {
        let feed = LiveFeed::new();
        let rx = feed.subscribe(json!({}));
        // Don't drain; fill past capacity.
        for i in 0..(SUBSCRIBER_BUFFER + 10) {
            feed.broadcast(LiveEventType::Heartbeat, json!({"n": i}));
        }
        assert_eq!(feed.subscriber_count(), 0);
        drop(rx);
    }
}
