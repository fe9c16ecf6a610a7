//! Event field resolution.
//!
//! A literal has-property lookup is too narrow: any subtype of the abstract
//! aggregation relation may expose an event field. Resolution therefore
//! first computes the aggregation subtype closure and then attempts a
//! relative-path resolution per discovered kind, first success wins.
//! Well-formed models expose each named field through exactly one kind, so
//! discovery order needs no tie-break.

use crate::error::{EventError, EventResult, StoreError};
use crate::node::NodeId;
use crate::space::AddressSpace;
use crate::value::Value;
use crate::wellknown;

/// Resolves a named field of an event instance to its value-holding node.
///
/// # Errors
/// `FieldNotFound` if no aggregation relation kind resolves the path; any
/// other store error is propagated as-is.
pub fn find_event_field(
    space: &AddressSpace,
    root: NodeId,
    path: &[String],
) -> EventResult<NodeId> {
    for kind in space.subtype_closure(wellknown::AGGREGATES)? {
        match space.resolve_relative_path(root, kind, path) {
            Ok(target) => return Ok(target),
            Err(StoreError::PathNotResolved { .. }) => {}
            Err(other) => return Err(other.into()),
        }
    }
    Err(EventError::FieldNotFound {
        event: root,
        path: path.join("/"),
    })
}

/// Writes `value` into the named single-segment field of `event`.
pub(crate) fn write_event_field(
    space: &AddressSpace,
    event: NodeId,
    name: &str,
    value: Value,
) -> EventResult<()> {
    let target = find_event_field(space, event, &[name.to_string()])?;
    space.write_value(target, value)?;
    Ok(())
}

/// Reads the named single-segment field of `event`.
pub(crate) fn read_event_field(
    space: &AddressSpace,
    event: NodeId,
    name: &str,
) -> EventResult<Value> {
    let target = find_event_field(space, event, &[name.to_string()])?;
    Ok(space.read_value(target)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_finds_field_behind_any_aggregation_subtype() {
        let space = AddressSpace::new();
        let event = space.instantiate(wellknown::BASE_EVENT_TYPE, "x").unwrap();

        // EventId is linked via HasProperty, a subtype of Aggregates
        let target = find_event_field(&space, event, &[wellknown::EVENT_ID.to_string()]).unwrap();
        space.write_value(target, Value::Int(1)).unwrap();

        // a component-linked field resolves through the same closure
        let part = NodeId::new();
        space.insert(Node::variable(part, "State")).unwrap();
        space
            .add_reference(event, wellknown::HAS_COMPONENT, part)
            .unwrap();
        let resolved = find_event_field(&space, event, &["State".to_string()]).unwrap();
        assert_eq!(resolved, part);
    }

    #[test]
    fn test_missing_field_is_not_found() {
        let space = AddressSpace::new();
        let event = space.instantiate(wellknown::BASE_EVENT_TYPE, "x").unwrap();
        let err = find_event_field(&space, event, &["Message".to_string()]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_non_aggregation_edges_are_invisible() {
        let space = AddressSpace::new();
        let event = space.instantiate(wellknown::BASE_EVENT_TYPE, "x").unwrap();
        let stray = NodeId::new();
        space.insert(Node::variable(stray, "Loose")).unwrap();
        space
            .add_reference(event, wellknown::ORGANIZES, stray)
            .unwrap();

        let err = find_event_field(&space, event, &["Loose".to_string()]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_field_write_read_round_trip() {
        let space = AddressSpace::new();
        let event = space.instantiate(wellknown::BASE_EVENT_TYPE, "x").unwrap();
        write_event_field(&space, event, wellknown::SOURCE_NODE, Value::Int(4)).unwrap();
        assert_eq!(
            read_event_field(&space, event, wellknown::SOURCE_NODE).unwrap(),
            Value::Int(4)
        );
    }
}
