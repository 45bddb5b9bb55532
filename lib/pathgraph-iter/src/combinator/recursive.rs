use std::collections::VecDeque;

use pathgraph_model::CancellationToken;
use rustc_hash::FxHashSet;

use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::{TagMap, TagValue};

/// One step of the morphism `Recursive` closes over: given a node, produce
/// an iterator of its immediate neighbors under that morphism. Supplied by
/// `pathgraph-path` when it lowers `follow_recursive`.
pub type StepFn = Box<dyn Fn(Ref) -> Box<dyn QueryIter>>;

/// `Recursive(start, morphism, max_depth)`: the fixed-point closure of
/// repeatedly applying `step` to the frontier, breadth-first. De-dupes
/// globally (a node already discovered is never re-queued, guaranteeing
/// termination on cyclic graphs) and stops at `max_depth` or when a round
/// discovers nothing new. Can optionally emit the discovery depth under
/// `depth_tag`.
pub struct RecursiveIterator {
    step: StepFn,
    max_depth: Option<u32>,
    depth_tag: Option<String>,
    all_seen: FxHashSet<Ref>,
    frontier: VecDeque<(Ref, u32)>,
    current: Option<(Ref, u32)>,
    err: Option<IterError>,
    cancellation: CancellationToken,
    id: u64,
}

impl std::fmt::Debug for RecursiveIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecursiveIterator")
            .field("max_depth", &self.max_depth)
            .field("current", &self.current)
            .field("discovered", &self.all_seen.len())
            .finish()
    }
}

impl RecursiveIterator {
    pub fn new(
        mut start: Box<dyn QueryIter>,
        step: StepFn,
        max_depth: Option<u32>,
        depth_tag: Option<String>,
        cancellation: CancellationToken,
    ) -> Self {
        let mut all_seen = FxHashSet::default();
        let mut frontier = VecDeque::new();
        let mut err = None;
        while start.next() {
            if cancellation.is_cancelled() {
                err = Some(IterError::Cancelled);
                break;
            }
            if let Some(r) = start.result() {
                if all_seen.insert(r) {
                    frontier.push_back((r, 0));
                }
            }
        }
        if err.is_none() {
            err = start.err().cloned();
        }
        Self {
            step,
            max_depth,
            depth_tag,
            all_seen,
            frontier,
            current: None,
            err,
            cancellation,
            id: next_iter_id(),
        }
    }
}

impl QueryIter for RecursiveIterator {
    fn next(&mut self) -> bool {
        if self.err.is_some() {
            return false;
        }
        if self.cancellation.is_cancelled() {
            self.err = Some(IterError::Cancelled);
            return false;
        }
        let Some((node, depth)) = self.frontier.pop_front() else {
            self.current = None;
            return false;
        };
        self.current = Some((node, depth));
        let below_max_depth = match self.max_depth {
            Some(max) => depth < max,
            None => true,
        };
        if below_max_depth {
            let mut step_iter = (self.step)(node);
            while step_iter.next() {
                if self.cancellation.is_cancelled() {
                    self.err = Some(IterError::Cancelled);
                    break;
                }
                if let Some(r) = step_iter.result() {
                    if self.all_seen.insert(r) {
                        self.frontier.push_back((r, depth + 1));
                    }
                }
            }
            if self.err.is_none() {
                if let Some(e) = step_iter.err() {
                    self.err = Some(e.clone());
                }
            }
        }
        true
    }

    fn result(&self) -> Option<Ref> {
        self.current.map(|(r, _)| r)
    }

    fn tag_results(&self, out: &mut TagMap) {
        if let (Some((_, depth)), Some(tag)) = (self.current, &self.depth_tag) {
            out.insert(tag.clone(), TagValue::Depth(depth));
        }
    }

    fn err(&self) -> Option<&IterError> {
        self.err.as_ref()
    }

    fn contains(&mut self, v: Ref) -> bool {
        if self.all_seen.contains(&v) {
            self.current = self.current.filter(|(r, _)| *r == v).or(Some((v, 0)));
            return true;
        }
        while self.next() {
            if self.result() == Some(v) {
                return true;
            }
        }
        false
    }

    fn stats(&self) -> IterStats {
        let size = (self.all_seen.len() + self.frontier.len()) as u64;
        IterStats::estimate(size, 4.0, 4.0)
    }

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::FixedIterator;

    fn chain() -> StepFn {
        // node n -> n + 1, capped at 5, models a simple follows-chain.
        Box::new(|r: Ref| -> Box<dyn QueryIter> {
            let Ref::Node(id) = r else {
                return Box::new(FixedIterator::new([]));
            };
            if id >= 5 {
                Box::new(FixedIterator::new([]))
            } else {
                Box::new(FixedIterator::singleton(Ref::Node(id + 1)))
            }
        })
    }

    #[test]
    fn terminates_and_discovers_reachable_nodes() {
        let start = Box::new(FixedIterator::singleton(Ref::Node(1)));
        let mut recursive =
            RecursiveIterator::new(start, chain(), None, None, CancellationToken::default());
        let mut seen = Vec::new();
        while recursive.next() {
            seen.push(recursive.result().unwrap().id());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn max_depth_bounds_expansion() {
        let start = Box::new(FixedIterator::singleton(Ref::Node(1)));
        let mut recursive =
            RecursiveIterator::new(start, chain(), Some(1), None, CancellationToken::default());
        let mut seen = Vec::new();
        while recursive.next() {
            seen.push(recursive.result().unwrap().id());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn cycles_terminate() {
        let step: StepFn = Box::new(|r: Ref| -> Box<dyn QueryIter> {
            // every node points back to node 1: a 1-cycle.
            let _ = r;
            Box::new(FixedIterator::singleton(Ref::Node(1)))
        });
        let start = Box::new(FixedIterator::singleton(Ref::Node(1)));
        let mut recursive =
            RecursiveIterator::new(start, step, None, None, CancellationToken::default());
        let mut count = 0;
        while recursive.next() {
            count += 1;
            assert!(count < 100, "recursive closure did not terminate");
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn precancelled_token_stops_before_any_expansion() {
        let start = Box::new(FixedIterator::singleton(Ref::Node(1)));
        let token = CancellationToken::new();
        token.cancel();
        let mut recursive = RecursiveIterator::new(start, chain(), None, None, token);
        assert!(!recursive.next());
        assert!(matches!(recursive.err(), Some(IterError::Cancelled)));
    }
}
