use pathgraph_model::Value;
use pathgraph_store::{MemoryStore, QuadStore};

use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// A `lt`/`lte`/`gt`/`gte` comparison against a reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    fn accepts(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match (self, ordering) {
            (Self::Lt, Less) | (Self::Lte, Less | Equal) => true,
            (Self::Gt, Greater) | (Self::Gte, Greater | Equal) => true,
            _ => false,
        }
    }
}

enum FilterKind {
    Regex(regex::Regex),
    Compare(Comparator, Value),
}

/// `Regex`/`Comparison` filter: restricts a node set to values matching a
/// regex (string-like values only) or a comparator against a reference
/// value.
pub struct FilterIterator {
    store: MemoryStore,
    sub: Box<dyn QueryIter>,
    kind: FilterKind,
    id: u64,
}

impl std::fmt::Debug for FilterIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterIterator").finish()
    }
}

impl FilterIterator {
    pub fn regex(store: &MemoryStore, sub: Box<dyn QueryIter>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            store: store.clone(),
            sub,
            kind: FilterKind::Regex(regex::Regex::new(pattern)?),
            id: next_iter_id(),
        })
    }

    pub fn compare(
        store: &MemoryStore,
        sub: Box<dyn QueryIter>,
        comparator: Comparator,
        reference: Value,
    ) -> Self {
        Self {
            store: store.clone(),
            sub,
            kind: FilterKind::Compare(comparator, reference),
            id: next_iter_id(),
        }
    }

    fn matches(&self, id: i64) -> bool {
        let value = self.store.lookup_value(id);
        match &self.kind {
            FilterKind::Regex(re) => string_body(&value).is_some_and(|s| re.is_match(s)),
            FilterKind::Compare(comparator, reference) => {
                comparator.accepts(value.cmp(reference))
            }
        }
    }
}

/// String-like values a regex filter may inspect; restricted to these
/// unless a future `refs` escape hatch is added.
fn string_body(value: &Value) -> Option<&str> {
    match value {
        Value::String(s)
        | Value::LangString { value: s, .. }
        | Value::TypedString { value: s, .. }
        | Value::Iri(s)
        | Value::Raw(s) => Some(s),
        _ => None,
    }
}

impl QueryIter for FilterIterator {
    fn next(&mut self) -> bool {
        loop {
            if !self.sub.next() {
                return false;
            }
            if let Some(Ref::Node(id)) = self.sub.result() {
                if self.matches(id) {
                    return true;
                }
            }
        }
    }

    fn result(&self) -> Option<Ref> {
        self.sub.result()
    }

    fn next_path(&mut self) -> bool {
        self.sub.next_path()
    }

    fn tag_results(&self, out: &mut TagMap) {
        self.sub.tag_results(out);
    }

    fn err(&self) -> Option<&IterError> {
        self.sub.err()
    }

    fn close(&mut self) {
        self.sub.close();
    }

    fn contains(&mut self, v: Ref) -> bool {
        let Ref::Node(id) = v else { return false };
        self.matches(id) && self.sub.contains(v)
    }

    fn stats(&self) -> IterStats {
        let sub = self.sub.stats();
        IterStats::estimate(sub.size, sub.next_cost, sub.contains_cost)
    }

    fn id(&self) -> u64 {
        self.id
    }
}
