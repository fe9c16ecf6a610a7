//! Address-space node model.
//!
//! Nodes are the vertices of the server address space, connected by typed,
//! directed references. Two reference families matter for the event engine:
//! has-subtype edges (type hierarchy closures) and structural containment
//! edges (ancestor discovery and origin validation).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Value;

/// Globally unique, stable node identifier.
///
/// Once assigned, a `NodeId` never changes. Well-known base-model nodes use
/// fixed ids (see [`crate::wellknown`]); everything else gets a random one.
///
/// # Examples
///
/// ```
/// use opaline::NodeId;
///
/// let id = NodeId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a new random node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a node ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a node ID from a fixed 128-bit value (well-known ids).
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Creates a nil node ID (for testing or sentinel values).
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NodeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<NodeId> for Uuid {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Classification of address-space nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// A concrete object (folders, devices, event instances).
    Object,
    /// A value-holding node (event properties).
    Variable,
    /// A type node objects are instantiated from.
    ObjectType,
    /// A node naming a reference kind; edges are typed by these ids.
    ReferenceType,
}

/// Direction of a reference relative to the node that stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDirection {
    /// Source-to-target edge stored on the source.
    Forward,
    /// Mirror edge stored on the target.
    Inverse,
}

/// One typed, directed edge of the address-space graph.
///
/// Every edge is stored twice: forward on its source node and inverse on its
/// target node, so ancestor walks never need a global edge scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Id of the reference-type node this edge is typed by.
    pub kind: NodeId,
    /// The node on the other end of the edge.
    pub target: NodeId,
    /// Whether this entry is the forward or the mirror half of the edge.
    pub direction: ReferenceDirection,
}

impl Reference {
    /// Returns true for the forward half of an edge of the given kind.
    #[must_use]
    pub fn is_forward_of(&self, kind: NodeId) -> bool {
        self.direction == ReferenceDirection::Forward && self.kind == kind
    }

    /// Returns true for the inverse half of an edge of the given kind.
    #[must_use]
    pub fn is_inverse_of(&self, kind: NodeId) -> bool {
        self.direction == ReferenceDirection::Inverse && self.kind == kind
    }
}

/// An address-space node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Globally unique identifier.
    pub id: NodeId,
    /// Name used by relative-path resolution.
    pub browse_name: String,
    /// Human-readable display text.
    pub display_name: String,
    /// Node classification.
    pub node_class: NodeClass,
    /// Type this node was instantiated from (objects only).
    pub type_definition: Option<NodeId>,
    /// Current value attribute (variables only).
    pub value: Option<Value>,
    /// Edges stored on this node, both halves.
    pub references: Vec<Reference>,
}

impl Node {
    /// Creates an object node.
    #[must_use]
    pub fn object(id: NodeId, browse_name: impl Into<String>) -> Self {
        let browse_name = browse_name.into();
        Self {
            id,
            display_name: browse_name.clone(),
            browse_name,
            node_class: NodeClass::Object,
            type_definition: None,
            value: None,
            references: Vec::new(),
        }
    }

    /// Creates a variable node with no value set.
    #[must_use]
    pub fn variable(id: NodeId, browse_name: impl Into<String>) -> Self {
        let browse_name = browse_name.into();
        Self {
            id,
            display_name: browse_name.clone(),
            browse_name,
            node_class: NodeClass::Variable,
            type_definition: None,
            value: None,
            references: Vec::new(),
        }
    }

    /// Creates an object-type node.
    #[must_use]
    pub fn object_type(id: NodeId, browse_name: impl Into<String>) -> Self {
        let mut node = Self::object(id, browse_name);
        node.node_class = NodeClass::ObjectType;
        node
    }

    /// Creates a reference-type node.
    #[must_use]
    pub fn reference_type(id: NodeId, browse_name: impl Into<String>) -> Self {
        let mut node = Self::object(id, browse_name);
        node.node_class = NodeClass::ReferenceType;
        node
    }

    /// Overrides the display text.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Marks this node as an instance of the given type.
    #[must_use]
    pub fn with_type_definition(mut self, type_id: NodeId) -> Self {
        self.type_definition = Some(type_id);
        self
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_creation() {
        let id1 = NodeId::new();
        let id2 = NodeId::new();
        assert_ne!(id1, id2);
        assert!(!id1.is_nil());
    }

    #[test]
    fn test_node_id_nil() {
        assert!(NodeId::nil().is_nil());
    }

    #[test]
    fn test_node_id_from_u128_is_stable() {
        let a = NodeId::from_u128(42);
        let b = NodeId::from_u128(42);
        assert_eq!(a, b);
        assert_ne!(a, NodeId::from_u128(43));
    }

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new();
        let display = format!("{id}");
        assert!(display.contains('-')); // UUID format
    }

    #[test]
    fn test_node_constructors() {
        let id = NodeId::new();
        let obj = Node::object(id, "Boiler");
        assert_eq!(obj.node_class, NodeClass::Object);
        assert_eq!(obj.browse_name, "Boiler");
        assert_eq!(obj.display_name, "Boiler");
        assert!(obj.references.is_empty());

        let var = Node::variable(NodeId::new(), "Severity");
        assert_eq!(var.node_class, NodeClass::Variable);
        assert!(var.value.is_none());

        let typed = Node::object(NodeId::new(), "").with_type_definition(id);
        assert_eq!(typed.type_definition, Some(id));
    }

    #[test]
    fn test_node_equality_is_by_id() {
        let id = NodeId::new();
        let a = Node::object(id, "A");
        let b = Node::variable(id, "B");
        assert_eq!(a, b);
    }

    #[test]
    fn test_reference_direction_helpers() {
        let kind = NodeId::new();
        let forward = Reference {
            kind,
            target: NodeId::new(),
            direction: ReferenceDirection::Forward,
        };
        assert!(forward.is_forward_of(kind));
        assert!(!forward.is_inverse_of(kind));
        assert!(!forward.is_forward_of(NodeId::new()));
    }
}
