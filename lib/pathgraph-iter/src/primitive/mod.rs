//! Primitive iterators: `Null`, `All`, `Fixed`, `IndexScan`.

mod all;
mod fixed;
mod index_scan;
mod null;

pub use all::AllIterator;
pub use fixed::FixedIterator;
pub use index_scan::IndexScanIterator;
pub use null::NullIterator;
