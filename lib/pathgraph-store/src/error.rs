use crate::delta::{Delta, DeltaErrorKind};

/// Errors surfaced by [`crate::MemoryStore`] and any other `QuadStore` backend.
///
/// `#[non_exhaustive]` so a disk-backed or networked backend can add a variant
/// (e.g. a richer `Backend` payload) without breaking downstream matches.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A delta in an `apply_deltas` batch could not be applied.
    #[error("delta error ({kind}) on {delta:?}")]
    Delta {
        delta: Box<Delta>,
        kind: DeltaErrorKind,
    },
    /// A requested value or quad id is absent.
    #[error("not found")]
    NotFound,
    /// Cooperative cancellation observed mid-apply.
    #[error("operation cancelled")]
    Cancelled,
    /// A store invariant was violated; see `MemoryStore::validate`.
    #[error("internal invariant violated: {0}")]
    Internal(String),
    /// Opaque wrapper for an error raised by a non-memory backend.
    #[error("backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}
