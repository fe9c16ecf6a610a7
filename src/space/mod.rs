//! In-memory address space: the object store the event engine drives.
//!
//! Node lookups return owned clones and watcher lists are cloned snapshots,
//! so an in-progress traversal never observes concurrent mutation and no
//! node handle outlives a call into the store. Graph walks are iterative
//! over an explicit work queue with a visited set; the store does not
//! guarantee that the subtype or containment graphs are loop-free.

/// Relative-path resolution and iterative graph closures.
pub mod browse;
/// Thread-safe node storage, instantiation, and watcher registration.
pub mod store;

pub use store::AddressSpace;
