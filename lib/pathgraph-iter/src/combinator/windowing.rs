use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `Limit(sub, n)`: caps the number of results. `Limit(S, 0)` yields
/// zero results. `contains` passes through unchanged — membership of a value
/// in the underlying set doesn't depend on enumeration order.
#[derive(Debug)]
pub struct LimitIterator {
    sub: Box<dyn QueryIter>,
    limit: u64,
    emitted: u64,
    id: u64,
}

impl LimitIterator {
    pub fn new(sub: Box<dyn QueryIter>, limit: u64) -> Self {
        Self {
            sub,
            limit,
            emitted: 0,
            id: next_iter_id(),
        }
    }
}

impl QueryIter for LimitIterator {
    fn next(&mut self) -> bool {
        if self.emitted >= self.limit {
            return false;
        }
        if self.sub.next() {
            self.emitted += 1;
            true
        } else {
            false
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
        IterStats::estimate(sub.size.min(self.limit), sub.next_cost, sub.contains_cost)
    }

    fn sorted(&self) -> bool {
        self.sub.sorted()
    }

    fn id(&self) -> u64 {
        self.id
    }
}

/// `Skip(sub, n)`: discards the first `n` results. `Skip(S, 0)` is
/// identity.
#[derive(Debug)]
pub struct SkipIterator {
    sub: Box<dyn QueryIter>,
    skip: u64,
    skipped: bool,
    id: u64,
}

impl SkipIterator {
    pub fn new(sub: Box<dyn QueryIter>, skip: u64) -> Self {
        Self {
            sub,
            skip,
            skipped: false,
            id: next_iter_id(),
        }
    }

    fn ensure_skipped(&mut self) -> bool {
        if self.skipped {
            return true;
        }
        self.skipped = true;
        for _ in 0..self.skip {
            if !self.sub.next() {
                return false;
            }
        }
        true
    }
}

impl QueryIter for SkipIterator {
    fn next(&mut self) -> bool {
        if !self.ensure_skipped() {
            return false;
        }
        self.sub.next()
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
        IterStats::estimate(sub.size.saturating_sub(self.skip), sub.next_cost, sub.contains_cost)
    }

    fn sorted(&self) -> bool {
        self.sub.sorted()
    }

    fn id(&self) -> u64 {
        self.id
    }
}
