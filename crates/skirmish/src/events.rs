//! # Simulation Events
//!
//! One-way notification stream from the simulation to the host.
//!
//! ```text
//! ┌──────────────┐  try_send   ┌─────────────┐  drain   ┌──────────────┐
//! │  Simulation  │────────────>│   bounded   │─────────>│  Host (HUD,  │
//! │  (step)      │             │   channel   │          │  audio, log) │
//! └──────────────┘             └─────────────┘          └──────────────┘
//! ```
//!
//! The simulation never blocks on the channel: when it is full, events are
//! dropped and counted in the frame statistics.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use skirmish_core::{EntityId, EntityRef, PoolHandle, PoolId};

/// Events emitted by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// A registry entity became live.
    EntityAdded {
        /// Entity ID.
        id: EntityId,
    },

    /// A registry entity was torn down.
    EntityRemoved {
        /// Entity ID.
        id: EntityId,
    },

    /// A collision pair was dispatched.
    Collision {
        /// Entity notified first.
        incoming: EntityRef,
        /// Entity notified second.
        resident: EntityRef,
    },

    /// A pool spawn overwrote a still-active slot.
    PoolEviction {
        /// Pool that evicted.
        pool: PoolId,
        /// Slot that was overwritten.
        slot: PoolHandle,
    },
}

/// Bounded event bus.
///
/// Pre-allocates the channel so sending never grows memory.
pub struct EventBus {
    /// Sender end - held by the simulation.
    sender: Sender<SimEvent>,
    /// Receiver end - held by the host.
    receiver: Receiver<SimEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<SimEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the event was dropped because the channel is full
    /// or every receiver is gone.
    #[inline]
    pub fn send(&self, event: SimEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<SimEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[must_use]
    pub fn drain(&self) -> Vec<SimEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<SimEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_roundtrip() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(SimEvent::EntityAdded {
            id: EntityId::from_raw(1)
        }));
        assert!(receiver.has_events());
        assert_eq!(
            receiver.try_recv(),
            Some(SimEvent::EntityAdded {
                id: EntityId::from_raw(1)
            })
        );
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_full_channel_drops_without_blocking() {
        let bus = EventBus::new(2);
        let sender = bus.sender();
        let event = SimEvent::EntityRemoved {
            id: EntityId::from_raw(3),
        };

        assert!(sender.send(event));
        assert!(sender.send(event));
        assert!(!sender.send(event));

        let receiver = bus.receiver();
        assert_eq!(receiver.pending_count(), 2);
        assert_eq!(receiver.drain().len(), 2);
        assert!(!receiver.has_events());
    }
}
