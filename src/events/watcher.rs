//! Watchers, subscriptions, and notification queues.
//!
//! A watcher is a client-registered interest: it owns an event filter and a
//! bounded local queue of notifications. Its subscription aggregates every
//! watcher's deliveries in a global queue drained by the publish cycle.
//! Each notification is held by exactly these two containers for its entire
//! lifetime; enqueue and release always happen pairwise.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::events::filter::{EventFieldList, EventFilter};

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend(format!("poisoned lock: {context}"))
}

/// Unique identifier for a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatcherId(Uuid);

impl WatcherId {
    /// Creates a new random watcher id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for WatcherId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Creates a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Sizing for a watcher's local notification queue.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Max notifications retained; the oldest pair is trimmed to make room
    /// before each insertion.
    pub max_queue_len: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            max_queue_len: 1024,
        }
    }
}

/// A filtered notification produced by one delivery.
///
/// Shared by exactly two containers - the owning watcher's local queue and
/// its subscription's global queue - and released from both together.
#[derive(Debug)]
pub struct Notification {
    /// Id of the watcher this notification was filtered for.
    pub watcher_id: WatcherId,
    /// Field values positionally aligned with the watcher's select clauses.
    pub fields: EventFieldList,
    watcher: Weak<Watcher>,
}

impl Notification {
    pub(crate) fn new(watcher: &Arc<Watcher>, fields: EventFieldList) -> Self {
        Self {
            watcher_id: watcher.id(),
            fields,
            watcher: Arc::downgrade(watcher),
        }
    }

    /// The watcher this notification belongs to, if still alive.
    #[must_use]
    pub fn watcher(&self) -> Option<Arc<Watcher>> {
        self.watcher.upgrade()
    }
}

/// A subscription aggregating all of its watchers' deliveries.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    queue: Mutex<VecDeque<Arc<Notification>>>,
}

impl Subscription {
    /// Creates an empty subscription.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SubscriptionId::new(),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// The subscription id.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Current global queue size.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.lock().map_or(0, |queue| queue.len())
    }

    /// Drains the global queue for one publish cycle.
    ///
    /// Each drained notification's paired reference in its watcher's local
    /// queue is released as well, so both containers let go together.
    pub fn drain(&self) -> Vec<Arc<Notification>> {
        let drained: Vec<Arc<Notification>> = match self.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for notification in &drained {
            if let Some(watcher) = notification.watcher() {
                watcher.release(notification);
            }
        }
        drained
    }

    fn remove(&self, notification: &Arc<Notification>) {
        if let Ok(mut queue) = self.queue.lock() {
            if let Some(pos) = queue.iter().position(|n| Arc::ptr_eq(n, notification)) {
                queue.remove(pos);
            }
        }
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

/// A monitored-item watcher: an event filter, a bounded local notification
/// queue, and the subscription the deliveries roll up into.
#[derive(Debug)]
pub struct Watcher {
    id: WatcherId,
    filter: EventFilter,
    max_queue_len: usize,
    queue: Mutex<VecDeque<Arc<Notification>>>,
    subscription: Arc<Subscription>,
}

impl Watcher {
    /// Creates a watcher delivering into `subscription`.
    #[must_use]
    pub fn new(filter: EventFilter, config: &WatcherConfig, subscription: Arc<Subscription>) -> Self {
        Self {
            id: WatcherId::new(),
            filter,
            max_queue_len: config.max_queue_len.max(1),
            queue: Mutex::new(VecDeque::new()),
            subscription,
        }
    }

    /// The watcher id.
    #[must_use]
    pub const fn id(&self) -> WatcherId {
        self.id
    }

    /// The filter applied to every delivery.
    #[must_use]
    pub const fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// The subscription this watcher delivers into.
    #[must_use]
    pub const fn subscription(&self) -> &Arc<Subscription> {
        &self.subscription
    }

    /// Current local queue size.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.lock().map_or(0, |queue| queue.len())
    }

    /// Snapshot of the queued notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Arc<Notification>> {
        self.queue
            .lock()
            .map_or_else(|_| Vec::new(), |queue| queue.iter().cloned().collect())
    }

    /// Trims the oldest notifications until one more insertion fits within
    /// the configured capacity. Every trimmed notification is removed from
    /// the subscription's global queue as well.
    pub(crate) fn ensure_queue_space(&self) {
        let mut trimmed = Vec::new();
        if let Ok(mut queue) = self.queue.lock() {
            while queue.len() >= self.max_queue_len {
                match queue.pop_front() {
                    Some(notification) => trimmed.push(notification),
                    None => break,
                }
            }
        }
        for notification in trimmed {
            self.subscription.remove(&notification);
        }
    }

    /// Appends a notification to the local queue and the subscription's
    /// global queue as one logical step: both locks are acquired (local
    /// first, then global) before either queue is touched.
    pub(crate) fn push_paired(&self, notification: Arc<Notification>) -> Result<(), StoreError> {
        let mut local = self.queue.lock().map_err(|_| lock_err("watcher queue"))?;
        let mut global = self
            .subscription
            .queue
            .lock()
            .map_err(|_| lock_err("subscription queue"))?;
        local.push_back(Arc::clone(&notification));
        global.push_back(notification);
        Ok(())
    }

    pub(crate) fn release(&self, notification: &Arc<Notification>) {
        if let Ok(mut queue) = self.queue.lock() {
            if let Some(pos) = queue.iter().position(|n| Arc::ptr_eq(n, notification)) {
                queue.remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::filter::SelectOperand;
    use crate::wellknown;

    fn watcher_with_capacity(capacity: usize) -> Arc<Watcher> {
        let filter = EventFilter::new(vec![SelectOperand::base_property(wellknown::EVENT_ID)]);
        let config = WatcherConfig {
            max_queue_len: capacity,
        };
        Arc::new(Watcher::new(filter, &config, Arc::new(Subscription::new())))
    }

    fn push(watcher: &Arc<Watcher>) -> Arc<Notification> {
        let note = Arc::new(Notification::new(watcher, EventFieldList::sized(1)));
        watcher.ensure_queue_space();
        watcher.push_paired(Arc::clone(&note)).unwrap();
        note
    }

    #[test]
    fn test_paired_enqueue_grows_both_queues() {
        let watcher = watcher_with_capacity(8);
        push(&watcher);
        push(&watcher);
        assert_eq!(watcher.queue_len(), 2);
        assert_eq!(watcher.subscription().queue_len(), 2);
    }

    #[test]
    fn test_trim_releases_the_pair() {
        let watcher = watcher_with_capacity(2);
        let first = push(&watcher);
        push(&watcher);
        push(&watcher); // trims `first` from both queues

        assert_eq!(watcher.queue_len(), 2);
        assert_eq!(watcher.subscription().queue_len(), 2);
        assert!(!watcher
            .notifications()
            .iter()
            .any(|n| Arc::ptr_eq(n, &first)));
    }

    #[test]
    fn test_capacity_floor_is_one() {
        let watcher = watcher_with_capacity(0);
        push(&watcher);
        push(&watcher);
        assert_eq!(watcher.queue_len(), 1);
        assert_eq!(watcher.subscription().queue_len(), 1);
    }

    #[test]
    fn test_drain_releases_both_containers() {
        let watcher = watcher_with_capacity(8);
        push(&watcher);
        push(&watcher);

        let drained = watcher.subscription().drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(watcher.subscription().queue_len(), 0);
        assert_eq!(watcher.queue_len(), 0);
    }

    #[test]
    fn test_notification_back_reference() {
        let watcher = watcher_with_capacity(4);
        let note = push(&watcher);
        assert_eq!(note.watcher_id, watcher.id());
        let owner = note.watcher().unwrap();
        assert_eq!(owner.id(), watcher.id());
    }

    #[test]
    fn test_distinct_ids() {
        assert_ne!(WatcherId::new(), WatcherId::new());
        assert_ne!(SubscriptionId::new(), SubscriptionId::new());
    }
}
