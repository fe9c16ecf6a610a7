//! Error types for the Opaline event engine.
//!
//! All errors are strongly typed using thiserror. Status handling follows a
//! strict propagation policy: argument validation failures abort the calling
//! operation immediately, per-field resolution failures during filtering are
//! recovered locally (empty field, continue), and delivery failures abort the
//! remaining fan-out without undoing prior deliveries.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by the in-memory address space.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Node not found.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A value read or write targeted a non-variable node.
    #[error("node {0} is not a variable")]
    NotAVariable(NodeId),

    /// Node id already present in the space.
    #[error("duplicate node: {0}")]
    DuplicateNode(NodeId),

    /// A relative-path hop had no matching target.
    #[error("no reference from {start} resolves browse name '{name}'")]
    PathNotResolved {
        /// Node the failing hop started from.
        start: NodeId,
        /// Browse name that could not be resolved.
        name: String,
    },

    /// Backend error.
    #[error("address space backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the event subsystem.
///
/// One variant per entry of the error taxonomy; status codes that the engine
/// can never produce are intentionally not represented.
#[derive(Debug, Error)]
pub enum EventError {
    /// The requested event type is outside the base event type hierarchy.
    #[error("event type {type_id} is not a subtype of the base event type")]
    InvalidEventType {
        /// The rejected type id.
        type_id: NodeId,
    },

    /// The trigger origin does not lie under the Objects folder.
    #[error("origin {origin} is not reachable from the Objects folder")]
    InvalidOrigin {
        /// The rejected origin id.
        origin: NodeId,
    },

    /// The event filter carries no select clauses.
    #[error("event filter has no select clauses")]
    EmptyFilter,

    /// A non-empty where-clause was supplied; structural predicates are a
    /// stub extension point and cannot be evaluated yet.
    #[error("where clauses are not supported")]
    WhereClauseUnsupported,

    /// No aggregation relation kind resolved the requested event field.
    #[error("event field '{path}' not found on event {event}")]
    FieldNotFound {
        /// Event instance the resolution started from.
        event: NodeId,
        /// The unresolved browse path, joined with '/'.
        path: String,
    },

    /// The stored `EventId` value is not a 16-byte identifier.
    #[error("event {event} has a malformed EventId value")]
    MalformedEventId {
        /// Event instance holding the malformed value.
        event: NodeId,
    },

    /// Error bubbled up from the address space.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EventError {
    /// Returns true if this error rejects an argument of a public operation.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidEventType { .. } | Self::InvalidOrigin { .. }
        )
    }

    /// Returns true if this error reports an unresolvable event field.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound { .. })
    }
}

/// Result type alias for event operations.
pub type EventResult<T> = Result<T, EventError>;
