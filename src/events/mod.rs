// events/mod.rs
use dashmap::DashMap;

use crate::models::{Channel, ChannelState};

type StateCallback = Box<dyn Fn(ChannelState) + Send + Sync>;

/// Fans channel state updates out to whoever consumes them.
pub struct EventBus {
    subscribers: DashMap<Channel, Vec<StateCallback>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    pub fn publish(&self, channel: Channel, state: ChannelState) {
        if let Some(subscribers) = self.subscribers.get(&channel) {
            for callback in subscribers.iter() {
                (callback)(state);
            }
        }
    }

    pub fn subscribe<F: Fn(ChannelState) + Send + Sync + 'static>(
        &self,
        channel: Channel,
        callback: F,
    ) {
        self.subscribers
            .entry(channel)
            .or_default()
            .push(Box::new(callback));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
