use parking_lot::RwLock;
use serde::Serialize;

use crate::model::{now_iso, Id, Station};

/// A fire-and-forget broadcast to the shop-floor chat/notification channel,
/// keyed by order id + station + text. Emitted on rework requests and stage
/// completions; delivery is a collaborator concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationEvent {
    pub order_id: Id,
    pub station: Station,
    pub text: String,
    pub at: String,
}

impl StationEvent {
    pub fn new(order_id: impl Into<Id>, station: Station, text: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            station,
            text: text.into(),
            at: now_iso(),
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Fire-and-forget: implementations swallow delivery failures.
    async fn broadcast(&self, event: StationEvent);
}

/// Writes broadcasts to the log and keeps the most recent ones in memory so
/// the API can list them.
#[derive(Debug)]
pub struct MemoryNotifier {
    events: RwLock<Vec<StationEvent>>,
    capacity: usize,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            capacity: 256,
        }
    }

    /// Recent events, newest first.
    pub fn recent(&self) -> Vec<StationEvent> {
        let events = self.events.read();
        events.iter().rev().cloned().collect()
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn broadcast(&self, event: StationEvent) {
        log::info!("[{}] {} — {}", event.order_id, event.station, event.text);
        let mut events = self.events.write();
        events.push(event);
        let overflow = events.len().saturating_sub(self.capacity);
        if overflow > 0 {
            events.drain(..overflow);
        }
    }
}

/// Drops every broadcast. Handy where notifications are irrelevant.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait::async_trait]
impl Notifier for NullNotifier {
    async fn broadcast(&self, _event: StationEvent) {}
}
