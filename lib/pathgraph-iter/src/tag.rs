use rustc_hash::FxHashMap;

use crate::reference::Ref;

/// A tag binding: most tags capture a [`Ref`] from an intermediate traversal
/// point, but `Recursive`'s optional depth tag captures a plain depth count,
/// so the map's value type carries both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValue {
    Ref(Ref),
    Depth(u32),
}

impl TagValue {
    pub fn as_ref(self) -> Option<Ref> {
        match self {
            Self::Ref(r) => Some(r),
            Self::Depth(_) => None,
        }
    }
}

/// Per-result tag bindings, written by [`crate::QueryIter::tag_results`].
pub type TagMap = FxHashMap<String, TagValue>;

/// The named bindings an iterator assigns to its current result. Each
/// iterator carries an optional `Tagger` that assigns named bindings to its
/// current result when read by the caller; tags propagate up through
/// combinators.
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    names: Vec<String>,
}

impl Tagger {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Binds `result` under every name this tagger owns.
    pub fn write(&self, result: Ref, out: &mut TagMap) {
        for name in &self.names {
            out.insert(name.clone(), TagValue::Ref(result));
        }
    }
}
