//! Event engine: representation, filtering, and fan-out of event occurrences.
//!
//! An event occurrence lives as a transient address-space object: created
//! and populated by [`manager::EventManager::create_event`], read during
//! fan-out, and destroyed once its id has been extracted. Watchers receive a
//! per-filter field list; delivery into the watcher's local queue and its
//! subscription's global queue is one paired step.

/// Filter evaluation against a live event instance.
pub mod evaluator;
/// Per-watcher notification delivery.
pub mod fanout;
/// Client-facing filter types.
pub mod filter;
/// Event identity generation.
pub mod ident;
/// Event lifecycle orchestration.
pub mod manager;
/// Event field resolution over the aggregation closure.
pub mod resolver;
/// Watchers, subscriptions, and notification queues.
pub mod watcher;

pub use evaluator::evaluate_filter;
pub use fanout::deliver;
pub use filter::{EventFieldList, EventFilter, SelectOperand};
pub use ident::EventId;
pub use manager::EventManager;
pub use resolver::find_event_field;
pub use watcher::{
    Notification, Subscription, SubscriptionId, Watcher, WatcherConfig, WatcherId,
};
