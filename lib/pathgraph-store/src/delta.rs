use std::fmt;

use pathgraph_model::{CancellationToken, Quad};

/// Whether a [`Delta`] adds or removes a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Delete => "delete",
        })
    }
}

/// A single mutation submitted to [`crate::MemoryStore::apply_deltas`].
#[derive(Debug, Clone)]
pub struct Delta {
    pub action: Action,
    pub quad: Quad,
}

impl Delta {
    pub fn add(quad: Quad) -> Self {
        Self {
            action: Action::Add,
            quad,
        }
    }

    pub fn delete(quad: Quad) -> Self {
        Self {
            action: Action::Delete,
            quad,
        }
    }
}

/// The reason a single delta within a batch was rejected.
///
/// `InvalidAction` is not produced by [`crate::MemoryStore`] today — `Action`
/// is exhaustive here — but the variant exists so other `QuadStore` backends
/// that accept a wider action set have somewhere to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeltaErrorKind {
    QuadExists,
    QuadNotExist,
    InvalidAction,
}

impl fmt::Display for DeltaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::QuadExists => "quad already exists",
            Self::QuadNotExist => "quad does not exist",
            Self::InvalidAction => "invalid action",
        })
    }
}

/// Controls for [`crate::MemoryStore::apply_deltas`]'s two-phase application.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Suppress `QuadExists` errors; a duplicate add is a no-op.
    pub ignore_duplicate: bool,
    /// Suppress `QuadNotExist` errors; deleting an absent quad is a no-op.
    pub ignore_missing: bool,
    /// Polled once per delta in both the precheck and apply passes; a tripped
    /// token aborts the batch with `StoreError::Cancelled` before any further
    /// deltas are examined or applied.
    pub cancellation: Option<CancellationToken>,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_duplicate(mut self, value: bool) -> Self {
        self.ignore_duplicate = value;
        self
    }

    pub fn ignore_missing(mut self, value: bool) -> Self {
        self.ignore_missing = value;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
