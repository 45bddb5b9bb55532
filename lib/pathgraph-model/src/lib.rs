//! Typed RDF-style values and quads.
//!
//! This crate is a leaf: it has no notion of a store, an index, or an
//! iterator. It only defines what a [`Value`] is, how it orders and prints,
//! and what a [`Quad`] is.

mod cancel;
mod direction;
mod quad;
mod value;

pub use cancel::CancellationToken;
pub use direction::Direction;
pub use quad::Quad;
pub use value::{escape_literal, unescape, UnescapeError, Value};

pub use oxsdatatypes;
