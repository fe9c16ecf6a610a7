//! Well-known node identifiers and property names of the Opaline base model.
//!
//! Every address space created with [`crate::AddressSpace::new`] is seeded
//! with these nodes. Ids are fixed so that clients and servers agree on the
//! base model without negotiation.

use crate::node::NodeId;

/// Root container all event origins must lie under.
pub const OBJECTS_FOLDER: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0001);

/// Reference kind connecting a type to its subtypes.
pub const HAS_SUBTYPE: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0002);

/// Abstract aggregation relation; event fields are exposed through its
/// subtype closure.
pub const AGGREGATES: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0003);

/// Property-ownership relation, a subtype of [`AGGREGATES`].
pub const HAS_PROPERTY: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0004);

/// Structural part-of relation, a subtype of [`AGGREGATES`].
pub const HAS_COMPONENT: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0005);

/// Loose containment relation used by folders.
pub const ORGANIZES: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0006);

/// Root of the event type hierarchy.
pub const BASE_EVENT_TYPE: NodeId = NodeId::from_u128(0x4F50_414C_0000_0000_0000_0000_0000_0007);

/// Containment relation kinds accepted when validating an event origin and
/// when walking its ancestor closure.
pub const CONTAINMENT: [NodeId; 2] = [ORGANIZES, HAS_COMPONENT];

/// Browse name of the 16-byte event identifier property.
pub const EVENT_ID: &str = "EventId";

/// Browse name of the event type-id property.
pub const EVENT_TYPE: &str = "EventType";

/// Browse name of the origin-node property.
pub const SOURCE_NODE: &str = "SourceNode";

/// Browse name of the reception timestamp property.
pub const RECEIVE_TIME: &str = "ReceiveTime";

/// Browse names of the properties every event instance carries.
pub const BASE_EVENT_PROPERTIES: [&str; 4] = [EVENT_ID, EVENT_TYPE, SOURCE_NODE, RECEIVE_TIME];
