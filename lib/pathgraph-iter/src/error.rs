use crate::reference::Ref;

/// Errors latched into a scanner and surfaced through [`crate::QueryIter::err`]
/// after `next` returns `false`: per-iterator errors are latched into the
/// iterator and surfaced via `err` rather than unwinding.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum IterError {
    /// A [`Ref`] passed to an iterator doesn't match the shape it expected
    /// (e.g. a quad ref where a node was required).
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: Ref },
    /// Cooperative cancellation observed mid-scan.
    #[error("operation cancelled")]
    Cancelled,
    /// A lookup against the backing store failed mid-scan.
    #[error("store error: {0}")]
    Store(String),
}

impl From<pathgraph_store::StoreError> for IterError {
    fn from(error: pathgraph_store::StoreError) -> Self {
        match error {
            pathgraph_store::StoreError::Cancelled => Self::Cancelled,
            other => Self::Store(other.to_string()),
        }
    }
}
