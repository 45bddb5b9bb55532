//! The Path/morphism layer: a fluent builder that records a
//! traversal as an ordered list of [`Morphism`]s, a store-independent
//! [`plan::PlanNode`] tree those steps fold into, a local rule-based
//! [`optimizer`], and [`lower::lower`], which turns an optimized tree into a
//! `pathgraph-iter` iterator bound to a store.
//!
//! Nothing here talks to a store until [`Path::bind`] or [`Path::drain`] is
//! called — a `Path` built and never executed is just a small owned `Vec` of
//! steps, cheap to clone and to pass around.

mod context;
mod error;
mod lower;
mod morphism;
mod optimizer;
mod path;
pub mod plan;

pub use context::Context;
pub use error::PathError;
pub use morphism::Morphism;
pub use optimizer::optimize;
pub use path::{Path, StartNode};
