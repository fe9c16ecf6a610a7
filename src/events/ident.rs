//! Event identity generation.
//!
//! Event identifiers are 16 random bytes. Uniqueness is probabilistic, not
//! guaranteed, and no cryptographic property is claimed; the identifier only
//! needs to be collision-resistant across the lifetime of a server.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Value;

/// A 16-byte event identifier.
///
/// Generated once per event instance before the instance becomes visible to
/// any watcher, and immutable afterwards. The hex rendering doubles as the
/// display text of the instance node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId([u8; 16]);

impl EventId {
    /// Identifier length in bytes.
    pub const LEN: usize = 16;

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(*Uuid::new_v4().as_bytes())
    }

    /// Wraps an existing 16-byte identifier.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Reads an identifier from a slice; `None` unless exactly 16 bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(bytes).ok().map(Self)
    }

    /// Returns the identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Hex rendering of the identifier.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<EventId> for Value {
    fn from(id: EventId) -> Self {
        Self::Bytes(id.0.to_vec())
    }
}
