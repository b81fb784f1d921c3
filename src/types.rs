//! Basic type definitions for the matchmaking server
//!
//! Provides the `ClientId` newtype: a UUID-based unique client identifier.
//! Ids are assigned once at connect time and never reused while the
//! process runs.

use uuid::Uuid;

/// Unique client identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe client identification.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client ID from its wire (string) form
    ///
    /// Returns None for anything that is not a valid UUID. Inbound
    /// messages carrying an unparseable id are dropped at the transport
    /// boundary.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
