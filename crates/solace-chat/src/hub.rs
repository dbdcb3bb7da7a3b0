use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use solace_types::ChatEvent;
use tokio::sync::broadcast;

/// Buffered events per user before slow receivers start lagging
const CHANNEL_CAPACITY: usize = 64;

/// Per-user broadcast channels for live chat events.
///
/// A user may hold several sockets; each subscription gets every event
/// published for that user after it subscribed.
#[derive(Default)]
pub struct EventHub {
    channels: RwLock<HashMap<String, broadcast::Sender<ChatEvent>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, user_id: &str) -> broadcast::Receiver<ChatEvent> {
        if let Some(sender) = self.read().get(user_id) {
            return sender.subscribe();
        }

        self.write()
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Deliver an event to every live subscription of the user.
    /// Returns the number of receivers reached; zero when nobody listens.
    pub fn publish(&self, user_id: &str, event: ChatEvent) -> usize {
        let delivered = match self.read().get(user_id) {
            Some(sender) => sender.send(event).ok(),
            None => return 0,
        };

        match delivered {
            Some(count) => count,
            None => {
                // every receiver is gone
                self.remove_if_idle(user_id);
                0
            }
        }
    }

    /// Drop channels that no longer have receivers
    pub fn prune(&self) -> usize {
        let mut channels = self.write();
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }

    pub fn subscriber_count(&self, user_id: &str) -> usize {
        self.read()
            .get(user_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.read().len()
    }

    fn remove_if_idle(&self, user_id: &str) {
        let mut channels = self.write();
        if channels
            .get(user_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(user_id);
            tracing::debug!(user_id, "Dropped idle event channel");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, broadcast::Sender<ChatEvent>>> {
        self.channels.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, broadcast::Sender<ChatEvent>>> {
        self.channels.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
