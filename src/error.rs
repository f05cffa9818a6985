use thiserror::Error;

/// Failures reported by [`SlotRing`](crate::SlotRing) operations.
///
/// All of them are recoverable and leave the ring unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// identity lookup found no slot holding the node
    #[error("node not found in ring")]
    NotFound,

    #[error("slot index {index} out of range for ring of {len} slots")]
    OutOfRange { index: usize, len: usize },

    /// predecessor/successor lookups need at least one slot to take a modulo over
    #[error("ring has no slots")]
    EmptyRing,
}

pub type Result<T> = std::result::Result<T, Error>;
