//! Event lifecycle orchestration.
//!
//! `EventManager` drives the full life of an event occurrence: instance
//! creation and constant population, triggering with ancestor fan-out, id
//! extraction, and teardown. All of it is synchronous on the calling thread;
//! the manager holds no state beyond the address space handle.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{EventError, EventResult};
use crate::events::fanout::deliver;
use crate::events::ident::EventId;
use crate::events::resolver::{read_event_field, write_event_field};
use crate::node::NodeId;
use crate::space::AddressSpace;
use crate::value::Value;
use crate::wellknown;

/// Public entry point of the event engine.
#[derive(Debug)]
pub struct EventManager {
    space: Arc<AddressSpace>,
}

impl EventManager {
    /// Creates a manager operating on the given address space.
    #[must_use]
    pub fn new(space: Arc<AddressSpace>) -> Self {
        Self { space }
    }

    /// The address space this manager operates on.
    #[must_use]
    pub fn space(&self) -> &Arc<AddressSpace> {
        &self.space
    }

    /// Creates a fresh, parentless event instance of `event_type`.
    ///
    /// The instance carries the generated identifier in its `EventId`
    /// property (also its display text, hex-rendered) and the type id in
    /// `EventType`. It is not registered in any queue until triggered.
    ///
    /// # Errors
    /// `InvalidEventType` if `event_type` is not in the subtype closure of
    /// the base event type; store errors otherwise.
    pub fn create_event(&self, event_type: NodeId) -> EventResult<NodeId> {
        if !self.space.is_in_tree(
            event_type,
            wellknown::BASE_EVENT_TYPE,
            &[wellknown::HAS_SUBTYPE],
        )? {
            tracing::error!(%event_type, "event type must be a subtype of the base event type");
            return Err(EventError::InvalidEventType {
                type_id: event_type,
            });
        }

        let event_id = EventId::generate();
        let instance = self.space.instantiate(event_type, event_id.to_hex())?;

        write_event_field(&self.space, instance, wellknown::EVENT_ID, event_id.into())?;
        write_event_field(
            &self.space,
            instance,
            wellknown::EVENT_TYPE,
            Value::NodeId(event_type),
        )?;
        Ok(instance)
    }

    /// Triggers `event` from `origin`: populates the constant properties,
    /// fans the filtered notification out to every watcher registered on the
    /// origin or one of its structural ancestors, extracts the event id, and
    /// deletes the instance.
    ///
    /// The first delivery error aborts the remaining fan-out; notifications
    /// already enqueued are kept. A non-`Ok` result therefore means "some
    /// watchers may have received the event", never "no watcher did".
    ///
    /// # Errors
    /// `InvalidOrigin` if `origin` does not lie under the Objects folder via
    /// an accepted containment relation; delivery, extraction, and deletion
    /// errors otherwise. If id extraction fails the instance is left alive
    /// for diagnosis.
    pub fn trigger_event(&self, event: NodeId, origin: NodeId) -> EventResult<EventId> {
        if !self
            .space
            .is_in_tree(origin, wellknown::OBJECTS_FOLDER, &wellknown::CONTAINMENT)?
        {
            tracing::error!(%origin, "event origin must lie under the Objects folder");
            return Err(EventError::InvalidOrigin { origin });
        }

        write_event_field(
            &self.space,
            event,
            wellknown::SOURCE_NODE,
            Value::NodeId(origin),
        )?;
        write_event_field(
            &self.space,
            event,
            wellknown::RECEIVE_TIME,
            Value::Time(Utc::now()),
        )?;

        for ancestor in self
            .space
            .inverse_closure(origin, &wellknown::CONTAINMENT)?
        {
            for watcher in self.space.watchers(ancestor)? {
                deliver(&self.space, event, &watcher)?;
            }
        }

        let event_id = match self.extract_event_id(event) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%event, error = %e, "event id extraction failed; instance kept for diagnosis");
                return Err(e);
            }
        };

        if let Err(e) = self.space.delete(event) {
            tracing::warn!(%event, error = %e, "failed to delete event instance after delivery");
            return Err(e.into());
        }
        Ok(event_id)
    }

    fn extract_event_id(&self, event: NodeId) -> EventResult<EventId> {
        match read_event_field(&self.space, event, wellknown::EVENT_ID)? {
            Value::Bytes(bytes) => {
                EventId::from_slice(&bytes).ok_or(EventError::MalformedEventId { event })
            }
            _ => Err(EventError::MalformedEventId { event }),
        }
    }
}
