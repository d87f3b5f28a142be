//! Event Bus for trail engine notifications.
//!
//! The EventBus provides a push-based subscription model for receiving
//! `TrailEvent`s. Subscribers register callbacks that are invoked in
//! publication order.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::ports::outbound::TrailEvent;

/// Event bus for trail events.
///
/// Push-based: subscribers register callbacks that are invoked when events arrive.
/// The bus holds strong references to subscribers, so they persist until explicitly
/// removed or the bus is dropped.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Box<dyn FnMut(TrailEvent) + Send + 'static>>>>,
}

impl EventBus {
    /// Create a new EventBus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all events.
    pub async fn subscribe(&self, callback: impl FnMut(TrailEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch a batch of events, preserving their order.
    ///
    /// Each subscriber's callback is invoked with a clone of every event.
    pub async fn dispatch_all(&self, events: Vec<TrailEvent>) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self.subscribers.lock().await;
        for event in events {
            for subscriber in subscribers.iter_mut() {
                subscriber(event.clone());
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
