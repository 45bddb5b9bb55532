use rustc_hash::FxHashSet;

use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::{TagMap, TagValue};

/// `back(tag)`: the only non-local morphism. Drives `chain` — the full
/// traversal built so far — and, for each of its results, reads out the
/// binding `chain` itself recorded for `tag` at the moment `tag` was
/// captured (tag maps reflect the state at the moment of the enclosing
/// `next`/`next_path` return). This constrains the result by and-ing in
/// everything traversed after that tag for free: a tagged node only
/// survives if the rest of `chain` managed to produce at least one result
/// from it.
#[derive(Debug)]
pub struct BackIterator {
    chain: Box<dyn QueryIter>,
    tag: String,
    seen: FxHashSet<Ref>,
    current: Option<Ref>,
    id: u64,
}

impl BackIterator {
    pub fn new(chain: Box<dyn QueryIter>, tag: impl Into<String>) -> Self {
        Self {
            chain,
            tag: tag.into(),
            seen: FxHashSet::default(),
            current: None,
            id: next_iter_id(),
        }
    }

    fn tag_of_current(&self) -> Option<Ref> {
        let mut tags = TagMap::default();
        self.chain.tag_results(&mut tags);
        match tags.get(&self.tag) {
            Some(TagValue::Ref(r)) => Some(*r),
            _ => None,
        }
    }
}

impl QueryIter for BackIterator {
    fn next(&mut self) -> bool {
        loop {
            if !self.chain.next() {
                self.current = None;
                return false;
            }
            if let Some(r) = self.tag_of_current() {
                if self.seen.insert(r) {
                    self.current = Some(r);
                    return true;
                }
            }
        }
    }

    fn result(&self) -> Option<Ref> {
        self.current
    }

    fn err(&self) -> Option<&IterError> {
        self.chain.err()
    }

    fn close(&mut self) {
        self.chain.close();
    }

    fn contains(&mut self, v: Ref) -> bool {
        if self.seen.contains(&v) {
            self.current = Some(v);
            return true;
        }
        while self.next() {
            if self.current == Some(v) {
                return true;
            }
        }
        false
    }

    fn stats(&self) -> IterStats {
        self.chain.stats()
    }

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::TagIterator;
    use crate::primitive::FixedIterator;
    use crate::tag::Tagger;

    #[test]
    fn surfaces_tagged_witnesses_for_surviving_results() {
        let tagged = Box::new(TagIterator::new(
            Box::new(FixedIterator::new([Ref::Node(1), Ref::Node(2)])),
            Tagger::new(vec!["foo".into()]),
        ));
        let mut back = BackIterator::new(tagged, "foo");
        let mut seen = Vec::new();
        while back.next() {
            seen.push(back.result().unwrap().id());
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
