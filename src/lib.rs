//! # Opaline - address-space events and subscription fan-out
//!
//! Opaline is an industrial control server. This crate implements its
//! event-notification engine: transient event occurrences are represented as
//! address-space objects, filtered per a client-supplied event filter, and
//! fanned out to every subscription watching the event's origin or any of its
//! structural ancestors.
//!
//! ## Core Concepts
//!
//! - **Node**: a vertex of the server address space, connected by typed,
//!   directed references
//! - **Event instance**: a transient, parentless object typed as a subtype of
//!   the base event type, destroyed after delivery
//! - **Watcher**: a client-registered interest with a filter and a bounded
//!   local notification queue
//! - **Subscription**: aggregates its watchers' deliveries for publish-cycle
//!   draining
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use opaline::{
//!     AddressSpace, EventFilter, EventManager, SelectOperand, Subscription,
//!     Watcher, WatcherConfig, wellknown,
//! };
//!
//! let space = Arc::new(AddressSpace::new());
//! let manager = EventManager::new(Arc::clone(&space));
//!
//! // Watch an origin object for base events.
//! let subscription = Arc::new(Subscription::new());
//! let filter = EventFilter::new(vec![SelectOperand::base_property("EventId")]);
//! let watcher = Arc::new(Watcher::new(filter, &WatcherConfig::default(), subscription));
//! space.register_watcher(origin, Arc::clone(&watcher))?;
//!
//! // Raise one occurrence of the base event type.
//! let event = manager.create_event(wellknown::BASE_EVENT_TYPE)?;
//! let event_id = manager.trigger_event(event, origin)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod events;
pub mod node;
pub mod space;
pub mod value;
pub mod wellknown;

// Re-export primary types at crate root for convenience
pub use error::{EventError, EventResult, StoreError};
pub use events::filter::{EventFieldList, EventFilter, SelectOperand};
pub use events::ident::EventId;
pub use events::manager::EventManager;
pub use events::watcher::{
    Notification, Subscription, SubscriptionId, Watcher, WatcherConfig, WatcherId,
};
pub use node::{Node, NodeClass, NodeId, Reference, ReferenceDirection};
pub use space::AddressSpace;
pub use value::Value;
