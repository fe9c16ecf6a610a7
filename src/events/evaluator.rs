//! Event filter evaluation.
//!
//! Evaluation has partial-failure semantics: the produced field list always
//! matches the select-clause count, and a clause that cannot be resolved
//! leaves its slot `Null` instead of failing the whole pass. Only an empty
//! select-clause list and a non-empty where-clause are reported as errors.

use serde_json::Value as JsonValue;

use crate::error::{EventError, EventResult};
use crate::events::filter::{EventFieldList, EventFilter};
use crate::events::resolver::find_event_field;
use crate::node::NodeId;
use crate::space::AddressSpace;
use crate::wellknown;

/// Evaluates `filter` against a live event instance, producing one field per
/// select clause.
///
/// A non-empty where-clause stops evaluation right after the clause being
/// processed and surfaces `WhereClauseUnsupported`; fields for later clauses
/// stay `Null`.
///
/// # Errors
/// `EmptyFilter` if the filter has no select clauses,
/// `WhereClauseUnsupported` on the stubbed predicate path.
pub fn evaluate_filter(
    space: &AddressSpace,
    event: NodeId,
    filter: &EventFilter,
) -> EventResult<EventFieldList> {
    if filter.select_clauses.is_empty() {
        return Err(EventError::EmptyFilter);
    }

    let mut fields = EventFieldList::sized(filter.select_clauses.len());
    for (index, clause) in filter.select_clauses.iter().enumerate() {
        if clause.type_id != wellknown::BASE_EVENT_TYPE
            && !instance_matches_type(space, event, clause.type_id)
        {
            continue;
        }

        let Ok(target) = find_event_field(space, event, &clause.browse_path) else {
            continue;
        };

        let (matched, unsupported) = apply_where_clause(&filter.where_clause);
        if matched {
            if let Ok(value) = space.read_value(target) {
                fields.set(index, value);
            }
        }
        if unsupported {
            return Err(EventError::WhereClauseUnsupported);
        }
    }
    Ok(fields)
}

/// Stubbed structural-predicate evaluation: an extension point, not a real
/// filter. Always reports a match, and flags any non-empty clause set as
/// unsupported.
fn apply_where_clause(where_clause: &[JsonValue]) -> (bool, bool) {
    if where_clause.is_empty() {
        return (true, false);
    }
    tracing::warn!("where clauses are not supported by the server");
    (true, true)
}

/// True if the instance's actual event type lies in the subtype closure of
/// `declared`. Any resolution failure counts as a mismatch.
fn instance_matches_type(space: &AddressSpace, event: NodeId, declared: NodeId) -> bool {
    let Ok(type_field) = find_event_field(space, event, &[wellknown::EVENT_TYPE.to_string()])
    else {
        return false;
    };
    let Some(actual) = space
        .read_value(type_field)
        .ok()
        .and_then(|value| value.as_node_id())
    else {
        return false;
    };
    space
        .is_in_tree(actual, declared, &[wellknown::HAS_SUBTYPE])
        .unwrap_or(false)
}
