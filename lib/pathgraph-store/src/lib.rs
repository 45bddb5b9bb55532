//! The in-memory quadstore: interning, the primitive table, the four
//! per-direction indexes, and delta application.
//!
//! This crate has no notion of an iterator algebra or a query plan — it only
//! promises the [`QuadStore`] contract that `pathgraph-iter` builds on.

mod delta;
mod error;
mod index;
mod iter;
mod memory;
mod primitive;
pub mod registry;
mod store;

pub use delta::{Action, ApplyOptions, Delta, DeltaErrorKind};
pub use error::StoreError;
pub use index::{CursorEnumerator, OrderedIndex};
pub use iter::{IdIter, NodeIdIter, QuadIdIter};
pub use memory::MemoryStore;
pub use store::{QuadStore, StoreStats};
