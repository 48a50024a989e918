//! Per-room event broadcaster for real-time client updates
//!
//! Fan-out is keyed by jam id: each room owns a tokio broadcast channel,
//! subscribers hold a receiver, and publishing is fire-and-forget. The
//! registry lock is released before any delivery happens; sending goes
//! through a sender handle cloned out of the map.

use std::collections::HashMap;
use std::sync::RwLock;

use huddle_common::events::HuddleEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Room-keyed broadcaster backing the jam SSE streams
pub struct JamBroadcaster {
    capacity: usize,
    rooms: RwLock<HashMap<i64, broadcast::Sender<HuddleEvent>>>,
}

impl JamBroadcaster {
    /// Create a new broadcaster
    ///
    /// `capacity` is the per-room event buffer (slow subscribers that lag
    /// past it miss events rather than block the sender).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to a room, creating it if needed
    pub fn subscribe(&self, room_id: i64) -> broadcast::Receiver<HuddleEvent> {
        let mut rooms = self.rooms.write().expect("room registry poisoned");
        rooms
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish an event to all subscribers of a room, ignoring delivery
    /// failures
    ///
    /// A room with no live subscribers is pruned from the registry.
    pub fn publish(&self, room_id: i64, event: HuddleEvent) {
        let sender = {
            let rooms = self.rooms.read().expect("room registry poisoned");
            rooms.get(&room_id).cloned()
        };

        let Some(sender) = sender else {
            return; // nobody listening on this room
        };

        match sender.send(event) {
            Ok(count) => debug!("Broadcast event to {} subscribers of room {}", count, room_id),
            Err(_) => {
                // All receivers dropped since the lookup; drop the room
                let mut rooms = self.rooms.write().expect("room registry poisoned");
                if rooms
                    .get(&room_id)
                    .is_some_and(|tx| tx.receiver_count() == 0)
                {
                    rooms.remove(&room_id);
                }
            }
        }
    }

    /// Number of live subscribers in a room
    pub fn subscriber_count(&self, room_id: i64) -> usize {
        let rooms = self.rooms.read().expect("room registry poisoned");
        rooms.get(&room_id).map_or(0, |tx| tx.receiver_count())
    }

    /// Number of rooms currently in the registry
    pub fn room_count(&self) -> usize {
        self.rooms.read().expect("room registry poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voted(jam_id: i64, entry_id: i64) -> HuddleEvent {
        HuddleEvent::EntryVoted {
            jam_id,
            entry_id,
            votes: 1,
        }
    }

    #[tokio::test]
    async fn delivers_to_room_subscribers() {
        let bus = JamBroadcaster::new(8);
        let mut rx = bus.subscribe(1);

        bus.publish(1, voted(1, 42));

        match rx.recv().await.unwrap() {
            HuddleEvent::EntryVoted { entry_id, .. } => assert_eq!(entry_id, 42),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let bus = JamBroadcaster::new(8);
        let mut rx_a = bus.subscribe(1);
        let mut rx_b = bus.subscribe(2);

        bus.publish(1, voted(1, 7));

        assert!(rx_a.recv().await.is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let bus = JamBroadcaster::new(8);
        bus.publish(99, voted(99, 1));
        assert_eq!(bus.subscriber_count(99), 0);
    }

    #[tokio::test]
    async fn empty_room_is_pruned_after_publish() {
        let bus = JamBroadcaster::new(8);
        let rx = bus.subscribe(5);
        assert_eq!(bus.room_count(), 1);

        drop(rx);
        bus.publish(5, voted(5, 1));
        assert_eq!(bus.room_count(), 0);
    }
}
