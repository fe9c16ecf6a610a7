//! Per-watcher notification delivery.

use std::sync::Arc;

use crate::error::EventResult;
use crate::events::evaluator::evaluate_filter;
use crate::events::watcher::{Notification, Watcher};
use crate::node::NodeId;
use crate::space::AddressSpace;

/// Filters `event` through the watcher's filter and appends the resulting
/// notification to the watcher's local queue and its subscription's global
/// queue.
///
/// Queue space is ensured (oldest pairs trimmed) before the filter runs. A
/// filter failure propagates without touching either queue; the append
/// itself happens with both queue locks held, so the pair of queues grows
/// together or not at all.
///
/// # Errors
/// Whatever [`evaluate_filter`] reports, plus backend errors from the queue
/// locks.
pub fn deliver(space: &AddressSpace, event: NodeId, watcher: &Arc<Watcher>) -> EventResult<()> {
    watcher.ensure_queue_space();
    let fields = evaluate_filter(space, event, watcher.filter())?;
    let notification = Arc::new(Notification::new(watcher, fields));
    watcher.push_paired(notification)?;
    Ok(())
}
