use crate::error::IterError;
use crate::primitive::NullIterator;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `And(subs…)`: set intersection. The sub with the smallest estimated size
/// drives iteration (`primary`); the rest only ever answer `contains` — the
/// children are reordered by ascending size at the point the iterator is
/// bound.
#[derive(Debug)]
pub struct AndIterator {
    primary: Box<dyn QueryIter>,
    others: Vec<Box<dyn QueryIter>>,
    id: u64,
}

impl AndIterator {
    /// Collapses to `NullIterator` on zero children and to the child itself
    /// on one (`And(S) ≡ S`).
    pub fn new(mut subs: Vec<Box<dyn QueryIter>>) -> Box<dyn QueryIter> {
        if subs.is_empty() {
            return Box::new(NullIterator::new());
        }
        if subs.len() == 1 {
            return subs.pop().expect("len checked above");
        }
        let primary_idx = subs
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.stats().size)
            .map(|(i, _)| i)
            .expect("subs is non-empty");
        let primary = subs.remove(primary_idx);
        Box::new(Self {
            primary,
            others: subs,
            id: next_iter_id(),
        })
    }
}

impl QueryIter for AndIterator {
    fn next(&mut self) -> bool {
        loop {
            if !self.primary.next() {
                return false;
            }
            let candidate = self.primary.result().expect("next returned true");
            if self.others.iter_mut().all(|other| other.contains(candidate)) {
                return true;
            }
        }
    }

    fn result(&self) -> Option<Ref> {
        self.primary.result()
    }

    fn next_path(&mut self) -> bool {
        self.others.iter_mut().any(|other| other.next_path())
    }

    fn tag_results(&self, out: &mut TagMap) {
        self.primary.tag_results(out);
        for other in &self.others {
            other.tag_results(out);
        }
    }

    fn err(&self) -> Option<&IterError> {
        self.primary
            .err()
            .or_else(|| self.others.iter().find_map(|o| o.err()))
    }

    fn close(&mut self) {
        self.primary.close();
        for other in &mut self.others {
            other.close();
        }
    }

    fn contains(&mut self, v: Ref) -> bool {
        self.primary.contains(v) && self.others.iter_mut().all(|other| other.contains(v))
    }

    fn stats(&self) -> IterStats {
        let primary_stats = self.primary.stats();
        let size = self
            .others
            .iter()
            .map(|o| o.stats().size)
            .fold(primary_stats.size, u64::min);
        let contains_cost = primary_stats.contains_cost
            + self.others.iter().map(|o| o.stats().contains_cost).sum::<f64>();
        IterStats::estimate(size, primary_stats.next_cost, contains_cost)
    }

    fn sorted(&self) -> bool {
        self.primary.sorted()
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
    fn intersects_two_sets() {
        let mut and = AndIterator::new(vec![fixed(&[1, 2, 3]), fixed(&[2, 3, 4])]);
        let mut seen = Vec::new();
        while and.next() {
            seen.push(and.result().unwrap().id());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![2, 3]);
    }

    #[test]
    fn single_child_collapses_to_identity() {
        let and = AndIterator::new(vec![fixed(&[1, 2])]);
        assert_eq!(and.stats().size, 2);
    }

    #[test]
    fn no_children_is_null() {
        let mut and = AndIterator::new(vec![]);
        assert!(!and.next());
    }
}
