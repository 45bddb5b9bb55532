/// Errors raised while building or binding a [`crate::Path`].
///
/// Optimizer rewrites never fail — a rule that doesn't apply is simply
/// skipped — so this enum only covers construction-time and lowering-time
/// failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PathError {
    /// An invalid regex was passed to `filter`.
    #[error("invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// Lowering a bound plan into an iterator tree failed.
    #[error(transparent)]
    Iter(#[from] pathgraph_iter::IterError),
}
