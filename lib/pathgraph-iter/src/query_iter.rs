use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::IterError;
use crate::reference::Ref;
use crate::tag::TagMap;

/// Cost estimates and an (upper bound, exact?) size estimate for a bound
/// iterator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterStats {
    /// Estimated cost of one `next` call.
    pub next_cost: f64,
    /// Estimated cost of one `contains` call.
    pub contains_cost: f64,
    /// Upper bound on the number of results.
    pub size: u64,
    /// Whether `size` is exact rather than an estimate.
    pub exact: bool,
}

impl IterStats {
    pub fn exact(size: u64, next_cost: f64, contains_cost: f64) -> Self {
        Self {
            next_cost,
            contains_cost,
            size,
            exact: true,
        }
    }

    pub fn estimate(size: u64, next_cost: f64, contains_cost: f64) -> Self {
        Self {
            next_cost,
            contains_cost,
            size,
            exact: false,
        }
    }
}

/// A unique id assigned on construction, used for debug output and cycle
/// detection during optimization.
pub fn next_iter_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// The uniform protocol every primitive and combinator iterator implements:
/// a Scanner capability (`next`/`result`/`next_path`/`tag_results`/`err`/
/// `close`), an Index capability (`contains`), and a Shape surface
/// (`stats`/`sorted`/`id`) collapsed into one object-safe trait so combinators
/// can hold `Box<dyn QueryIter>` children uniformly.
///
/// Errors never unwind: a scanner latches its first error and returns `false`
/// from `next` thereafter; callers inspect [`QueryIter::err`] once the loop
/// ends.
pub trait QueryIter: std::fmt::Debug {
    /// Advances to the next result; `false` at EOF or on first error.
    fn next(&mut self) -> bool;

    /// The current result, valid only after `next`/`next_path`/`contains`
    /// returned `true`.
    fn result(&self) -> Option<Ref>;

    /// Enumerates additional tag-bindings that yield the same `result`
    /// (distinguishes multiple witnesses for a single match). Default: a
    /// single witness per result.
    fn next_path(&mut self) -> bool {
        false
    }

    /// Writes this iterator's tag bindings for the current result into
    /// `out`, merging with whatever a parent combinator already wrote.
    /// Default: no tags of its own.
    fn tag_results(&self, _out: &mut TagMap) {}

    /// The first latched error, if any.
    fn err(&self) -> Option<&IterError> {
        None
    }

    /// Releases resources. Idempotent; default no-op (most iterators here
    /// hold no external resources, only an `Arc`-backed store handle).
    fn close(&mut self) {}

    /// Random-access membership test; on success, positions the iterator so
    /// `result()` returns `v` and `next_path` can enumerate alternate
    /// witnesses for it.
    fn contains(&mut self, v: Ref) -> bool;

    /// Cost estimates and size bound for this iterator.
    fn stats(&self) -> IterStats;

    /// Whether scan order follows the underlying index order (used by
    /// merge-style joins in `And`/`Or`).
    fn sorted(&self) -> bool {
        false
    }

    /// The id assigned at construction.
    fn id(&self) -> u64;
}
