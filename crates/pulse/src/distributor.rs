//! Fan-out of live outcomes to any number of subscribers.
//!
//! Every subscriber owns a bounded channel. Publishing never waits: a full
//! buffer drops that outcome for that subscriber only, and a subscriber that
//! misses two deliveries in a row is disconnected. A subscriber whose handle
//! was dropped is removed on the next publish.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};
use uuid::Uuid;

use crate::monitoring::types::Outcome;

/// Default per-subscriber buffer
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 16;

/// Consecutive failed deliveries after which a subscriber is dropped
const MAX_CONSECUTIVE_FAILURES: u32 = 2;

pub type SubscriberId = Uuid;

struct Slot {
    sender: mpsc::Sender<Arc<Outcome>>,
    consecutive_failures: u32,
}

/// Live outcome fan-out. Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct Distributor {
    subscribers: Arc<Mutex<HashMap<SubscriberId, Slot>>>,
    buffer: usize,
}

impl Default for Distributor {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}

impl Distributor {
    pub fn new(buffer: usize) -> Self {
        Self { subscribers: Arc::new(Mutex::new(HashMap::new())), buffer: buffer.max(1) }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SubscriberId, Slot>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a consumer for every outcome published from now on
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.registry().insert(id, Slot { sender, consecutive_failures: 0 });
        debug!(subscriber = %id, "Subscriber registered");
        Subscription { id, receiver }
    }

    /// Remove a consumer. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.registry().remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, "Subscriber removed");
        }
        removed
    }

    /// Deliver to every current subscriber without waiting on any of them
    pub fn publish(&self, outcome: Arc<Outcome>) {
        let mut registry = self.registry();

        registry.retain(|id, slot| match slot.sender.try_send(outcome.clone()) {
            Ok(()) => {
                slot.consecutive_failures = 0;
                true
            }
            Err(TrySendError::Full(_)) => {
                slot.consecutive_failures += 1;
                if slot.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    info!(subscriber = %id, "Dropping subscriber that stopped reading");
                    false
                } else {
                    debug!(subscriber = %id, "Subscriber buffer full, outcome skipped");
                    true
                }
            }
            Err(TrySendError::Closed(_)) => {
                debug!(subscriber = %id, "Subscriber disconnected");
                false
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }
}

/// Receiving end of a subscription.
///
/// Dropping it disconnects; the registry notices on the next publish.
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Arc<Outcome>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next outcome. `None` once the distributor has dropped
    /// this subscriber (unsubscribed or too slow) or has itself gone away.
    pub async fn recv(&mut self) -> Option<Arc<Outcome>> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`Subscription::recv`]
    pub fn try_recv(&mut self) -> Result<Arc<Outcome>, mpsc::error::TryRecvError> {
        self.receiver.try_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn outcome(latency_ms: u64) -> Arc<Outcome> {
        Arc::new(Outcome::from_response(200, Duration::from_millis(latency_ms), Utc::now()))
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_outcomes_in_order() {
        let distributor = Distributor::new(8);
        let mut a = distributor.subscribe();
        let mut b = distributor.subscribe();

        for i in 0..5 {
            distributor.publish(outcome(i));
        }

        for sub in [&mut a, &mut b] {
            for i in 0..5 {
                assert_eq!(sub.recv().await.unwrap().latency_ms(), i as i64);
            }
        }
    }

    #[tokio::test]
    async fn test_idle_subscriber_does_not_hold_back_reader() {
        let distributor = Distributor::new(2);
        let idle = distributor.subscribe();
        let mut reader = distributor.subscribe();

        for i in 0..5 {
            distributor.publish(outcome(i));
            let got = timeout(Duration::from_millis(100), reader.recv())
                .await
                .expect("reader was delayed")
                .expect("reader was disconnected");
            assert_eq!(got.latency_ms(), i as i64);
        }

        // The idle one missed two deliveries in a row and was dropped
        assert_eq!(distributor.subscriber_count(), 1);
        drop(idle);
    }

    #[tokio::test]
    async fn test_evicted_subscriber_drains_then_sees_end() {
        let distributor = Distributor::new(1);
        let mut slow = distributor.subscribe();

        distributor.publish(outcome(1));
        distributor.publish(outcome(2)); // full: first failure
        distributor.publish(outcome(3)); // full: second failure, dropped

        assert_eq!(slow.recv().await.unwrap().latency_ms(), 1);
        assert!(slow.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_single_miss_is_forgiven() {
        let distributor = Distributor::new(1);
        let mut sub = distributor.subscribe();

        distributor.publish(outcome(1));
        distributor.publish(outcome(2)); // skipped
        assert_eq!(sub.recv().await.unwrap().latency_ms(), 1);
        distributor.publish(outcome(3)); // delivered, resets the counter
        distributor.publish(outcome(4)); // skipped again, still only one miss

        assert_eq!(distributor.subscriber_count(), 1);
        assert_eq!(sub.recv().await.unwrap().latency_ms(), 3);
    }

    #[tokio::test]
    async fn test_dropped_handle_is_removed_on_next_publish() {
        let distributor = Distributor::default();
        let sub = distributor.subscribe();
        assert_eq!(distributor.subscriber_count(), 1);

        drop(sub);
        distributor.publish(outcome(1));

        assert_eq!(distributor.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_closes_the_stream() {
        let distributor = Distributor::default();
        let mut sub = distributor.subscribe();

        assert!(distributor.unsubscribe(sub.id()));
        assert!(!distributor.unsubscribe(sub.id()));
        distributor.publish(outcome(1));

        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn test_publish_without_subscribers_is_a_no_op() {
        let distributor = Distributor::default();
        distributor.publish(outcome(1));
        assert_eq!(distributor.subscriber_count(), 0);
    }
}
