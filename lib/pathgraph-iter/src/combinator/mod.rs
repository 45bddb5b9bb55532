//! Combinator iterators: `And`, `Or`, `Except`, `Unique`, `Limit`/`Skip`,
//! `LinksTo`, `HasA`, `Recursive`, `Save`, `Tag`, `Filter`, `Back`.

mod and;
mod back;
mod except;
mod filter;
mod has_a;
mod links_to;
mod or;
mod recursive;
mod save;
mod tag;
mod unique;
mod windowing;

pub use and::AndIterator;
pub use back::BackIterator;
pub use except::ExceptIterator;
pub use filter::{Comparator, FilterIterator};
pub use has_a::HasAIterator;
pub use links_to::LinksToIterator;
pub use or::OrIterator;
pub use recursive::{RecursiveIterator, StepFn};
pub use save::SaveIterator;
pub use tag::TagIterator;
pub use unique::UniqueIterator;
pub use windowing::{LimitIterator, SkipIterator};
