use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `Except(universe, exclude)`: set difference. `contains` is
/// `universe.contains ∧ ¬exclude.contains`.
#[derive(Debug)]
pub struct ExceptIterator {
    universe: Box<dyn QueryIter>,
    exclude: Box<dyn QueryIter>,
    id: u64,
}

impl ExceptIterator {
    pub fn new(universe: Box<dyn QueryIter>, exclude: Box<dyn QueryIter>) -> Self {
        Self {
            universe,
            exclude,
            id: next_iter_id(),
        }
    }
}

impl QueryIter for ExceptIterator {
    fn next(&mut self) -> bool {
        loop {
            if !self.universe.next() {
                return false;
            }
            let candidate = self.universe.result().expect("next returned true");
            if !self.exclude.contains(candidate) {
                return true;
            }
        }
    }

    fn result(&self) -> Option<Ref> {
        self.universe.result()
    }

    fn next_path(&mut self) -> bool {
        self.universe.next_path()
    }

    fn tag_results(&self, out: &mut TagMap) {
        self.universe.tag_results(out);
    }

    fn err(&self) -> Option<&IterError> {
        self.universe.err().or_else(|| self.exclude.err())
    }

    fn close(&mut self) {
        self.universe.close();
        self.exclude.close();
    }

    fn contains(&mut self, v: Ref) -> bool {
        self.universe.contains(v) && !self.exclude.contains(v)
    }

    fn stats(&self) -> IterStats {
        let universe = self.universe.stats();
        IterStats::estimate(
            universe.size,
            universe.next_cost,
            universe.contains_cost + self.exclude.stats().contains_cost,
        )
    }

    fn sorted(&self) -> bool {
        self.universe.sorted()
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
    fn removes_excluded_members() {
        let universe = Box::new(FixedIterator::new([Ref::Node(1), Ref::Node(2)]));
        let exclude = Box::new(FixedIterator::new([Ref::Node(1)]));
        let mut except = ExceptIterator::new(universe, exclude);
        assert!(except.next());
        assert_eq!(except.result(), Some(Ref::Node(2)));
        assert!(!except.next());
    }
}
