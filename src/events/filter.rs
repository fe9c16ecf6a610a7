//! Client-facing event filter types.
//!
//! These types are intentionally serializable so they can be carried in
//! monitored-item registration requests and echoed back in diagnostics.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;
use crate::value::Value;
use crate::wellknown;

/// One select-clause term: a declared event type plus a relative property
/// path from the event instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOperand {
    /// Event type the clause is declared against. Clauses declared against
    /// a type the event does not match resolve to an empty field.
    pub type_id: NodeId,
    /// Relative property path; its length is the path depth.
    pub browse_path: Vec<String>,
}

impl SelectOperand {
    /// Creates a select clause.
    #[must_use]
    pub const fn new(type_id: NodeId, browse_path: Vec<String>) -> Self {
        Self {
            type_id,
            browse_path,
        }
    }

    /// Select clause for a single-segment property declared on the base
    /// event type.
    #[must_use]
    pub fn base_property(name: impl Into<String>) -> Self {
        Self {
            type_id: wellknown::BASE_EVENT_TYPE,
            browse_path: vec![name.into()],
        }
    }

    /// Path depth of this clause.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.browse_path.len()
    }
}

/// A client-supplied event filter: an ordered select clause list plus an
/// optional structural predicate.
///
/// The where-clause is an opaque stub: the engine accepts it but cannot
/// evaluate it yet, and surfaces [`crate::EventError::WhereClauseUnsupported`]
/// whenever a non-empty one is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Ordered select clauses; at least one is required for evaluation.
    pub select_clauses: Vec<SelectOperand>,
    /// Structural predicate stub, not yet evaluated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub where_clause: Vec<serde_json::Value>,
}

impl EventFilter {
    /// Creates a filter with the given select clauses and no where-clause.
    #[must_use]
    pub const fn new(select_clauses: Vec<SelectOperand>) -> Self {
        Self {
            select_clauses,
            where_clause: Vec::new(),
        }
    }

    /// Attaches a where-clause stub.
    #[must_use]
    pub fn with_where_clause(mut self, where_clause: Vec<serde_json::Value>) -> Self {
        self.where_clause = where_clause;
        self
    }
}

/// Ordered field values positionally aligned with a filter's select clauses.
///
/// The length always equals the select-clause count of the filter that
/// produced it; unresolved or mismatched clauses stay [`Value::Null`] rather
/// than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFieldList(Vec<Value>);

impl EventFieldList {
    /// A field list of `len` empty placeholders.
    pub(crate) fn sized(len: usize) -> Self {
        Self(vec![Value::Null; len])
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the list has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The field at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// All fields in clause order.
    #[must_use]
    pub fn fields(&self) -> &[Value] {
        &self.0
    }

    pub(crate) fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }
}
