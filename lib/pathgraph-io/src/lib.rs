//! External interfaces: the line-oriented quad grammar
//! ("subject predicate object [label] .") loaders use to get data in and
//! out of a [`pathgraph_store::MemoryStore`], and the registration surfaces
//! a backend or query-language collaborator plugs into.
//!
//! This crate deliberately doesn't depend on `pathgraph-iter`: parsing and
//! serializing a quad stream never needs the iterator algebra, only the
//! value model and the store's write API.

mod error;
mod reader;
mod registry;
mod writer;

pub use error::QuadIoError;
pub use reader::{LineQuadReader, QuadReader};
pub use registry::{language, QueryLanguageFactory};
pub use writer::{LineQuadWriter, QuadWriter};
