//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{DefeatEvent, LifecycleEvent, RoundEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Resolved rounds and defeats
    Combat,
    /// Start, stop, auto-stop
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Combat, Topic::Lifecycle];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Round(Box<RoundEvent>),
    Defeat(DefeatEvent),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Round(_) | Event::Defeat(_) => Topic::Combat,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Delivery is
/// best-effort: a publish with no subscribers is dropped, and lagging
/// receivers lose the oldest events.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Returns a receiver that will only receive events for `topic`.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created in `with_capacity`.
            None => broadcast::channel(1).1,
        }
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use combat_core::CharacterId;

    use super::*;

    #[tokio::test]
    async fn events_are_routed_by_topic() {
        let bus = EventBus::with_capacity(8);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut combat = bus.subscribe(Topic::Combat);

        bus.publish(Event::Lifecycle(LifecycleEvent::Stopped {
            character: CharacterId(4),
        }));

        match lifecycle.recv().await.unwrap() {
            Event::Lifecycle(event) => assert_eq!(event.character(), CharacterId(4)),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let bus = EventBus::new();
        bus.publish(Event::Lifecycle(LifecycleEvent::Stopped {
            character: CharacterId(1),
        }));
    }
}
