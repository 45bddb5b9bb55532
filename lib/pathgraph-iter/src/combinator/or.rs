use crate::error::IterError;
use crate::primitive::NullIterator;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `Or(subs…)`: set union. Children are driven in order — the
/// first is exhausted before the next starts — so each source's own tags
/// stay attached to the path that produced them ("preserves each source's
/// tags on the appropriate path").
#[derive(Debug)]
pub struct OrIterator {
    subs: Vec<Box<dyn QueryIter>>,
    active: usize,
    id: u64,
}

impl OrIterator {
    /// Collapses to `NullIterator` on zero children and to the child itself
    /// on one (`Or(S) ≡ S`).
    pub fn new(subs: Vec<Box<dyn QueryIter>>) -> Box<dyn QueryIter> {
        if subs.is_empty() {
            return Box::new(NullIterator::new());
        }
        if subs.len() == 1 {
            return subs.into_iter().next().expect("len checked above");
        }
        Box::new(Self {
            subs,
            active: 0,
            id: next_iter_id(),
        })
    }
}

impl QueryIter for OrIterator {
    fn next(&mut self) -> bool {
        while self.active < self.subs.len() {
            if self.subs[self.active].next() {
                return true;
            }
            self.active += 1;
        }
        false
    }

    fn result(&self) -> Option<Ref> {
        self.subs.get(self.active).and_then(|s| s.result())
    }

    fn next_path(&mut self) -> bool {
        self.subs
            .get_mut(self.active)
            .is_some_and(|s| s.next_path())
    }

    fn tag_results(&self, out: &mut TagMap) {
        if let Some(sub) = self.subs.get(self.active) {
            sub.tag_results(out);
        }
    }

    fn err(&self) -> Option<&IterError> {
        self.subs.iter().find_map(|s| s.err())
    }

    fn close(&mut self) {
        for sub in &mut self.subs {
            sub.close();
        }
    }

    fn contains(&mut self, v: Ref) -> bool {
        for (i, sub) in self.subs.iter_mut().enumerate() {
            if sub.contains(v) {
                self.active = i;
                return true;
            }
        }
        false
    }

    fn stats(&self) -> IterStats {
        let size = self.subs.iter().map(|s| s.stats().size).sum();
        let next_cost =
            self.subs.iter().map(|s| s.stats().next_cost).sum::<f64>() / self.subs.len() as f64;
        let contains_cost = self.subs.iter().map(|s| s.stats().contains_cost).sum();
        let exact = self.subs.iter().all(|s| s.stats().exact);
        IterStats {
            next_cost,
            contains_cost,
            size,
            exact,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::FixedIterator;

    fn fixed(items: &[i64]) -> Box<dyn QueryIter> {
        Box::new(FixedIterator::new(items.iter().map(|&i| Ref::Node(i))))
    }

    #[test]
    fn unions_two_sets_preserving_duplicates() {
        let mut or = OrIterator::new(vec![fixed(&[1, 2]), fixed(&[2, 3])]);
        let mut seen = Vec::new();
        while or.next() {
            seen.push(or.result().unwrap().id());
        }
        assert_eq!(seen, vec![1, 2, 2, 3]);
    }

    #[test]
    fn contains_checks_every_child() {
        let mut or = OrIterator::new(vec![fixed(&[1]), fixed(&[2])]);
        assert!(or.contains(Ref::Node(2)));
        assert!(!or.contains(Ref::Node(99)));
    }
}
