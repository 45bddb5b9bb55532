//! The iterator algebra: a uniform Scanner/Index/Shape protocol
//! ([`QueryIter`]) plus every primitive and combinator iterator that
//! implements it, bound to a [`pathgraph_store::MemoryStore`].
//!
//! This crate has no notion of a query plan or a fluent builder — it only
//! promises that, given iterators already built over a store, their
//! composition behaves predictably. `pathgraph-path` is the layer that
//! decides *which* tree of these to build from a traversal query.

mod error;
mod query_iter;
mod reference;
mod tag;

pub mod combinator;
pub mod primitive;

pub use error::IterError;
pub use query_iter::{next_iter_id, IterStats, QueryIter};
pub use reference::Ref;
pub use tag::{TagMap, TagValue, Tagger};
