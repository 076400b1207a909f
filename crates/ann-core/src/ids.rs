use std::fmt;

/// Unique identifier for a vector within a store.
///
/// Unlike the tenant/collection/document ids this crate's teacher generates
/// with UUIDv7, a `VectorId` is chosen by the caller and carries no notion
/// of creation order — it wraps a plain `u64` rather than a `Uuid`, and has
/// no `new()` generator. `0` is a valid, ordinary id; there is no reserved
/// sentinel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorId(u64);

impl VectorId {
    /// Wraps a raw `u64` as a `VectorId`.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VectorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<VectorId> for u64 {
    fn from(value: VectorId) -> Self {
        value.0
    }
}
