use rustc_hash::FxHashSet;

use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `Unique(sub)`: de-duplication of results, keyed on `Ref` equality,
/// materialized as a hash set of already-seen keys.
#[derive(Debug)]
pub struct UniqueIterator {
    sub: Box<dyn QueryIter>,
    seen: FxHashSet<Ref>,
    id: u64,
}

impl UniqueIterator {
    pub fn new(sub: Box<dyn QueryIter>) -> Self {
        Self {
            sub,
            seen: FxHashSet::default(),
            id: next_iter_id(),
        }
    }
}

impl QueryIter for UniqueIterator {
    fn next(&mut self) -> bool {
        loop {
            if !self.sub.next() {
                return false;
            }
            let candidate = self.sub.result().expect("next returned true");
            if self.seen.insert(candidate) {
                return true;
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
        self.sub.contains(v)
    }

    fn stats(&self) -> IterStats {
        let sub = self.sub.stats();
        IterStats::estimate(sub.size, sub.next_cost, sub.contains_cost)
    }

    fn sorted(&self) -> bool {
        self.sub.sorted()
    }

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::FixedIterator;

    #[test]
    fn drops_repeated_results() {
        let sub = Box::new(FixedIterator::new([
            Ref::Node(1),
            Ref::Node(1),
            Ref::Node(2),
        ]));
        let mut unique = UniqueIterator::new(sub);
        let mut seen = Vec::new();
        while unique.next() {
            seen.push(unique.result().unwrap().id());
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
