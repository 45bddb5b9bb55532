use pathgraph_model::Direction;
use pathgraph_store::{MemoryStore, QuadStore};

use crate::error::IterError;
use crate::primitive::IndexScanIterator;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `HasA(sub, direction)`: the reverse of `LinksTo` — projects a set
/// of quads onto one of their directions. `next` produces a node; `next_path`
/// first re-enumerates alternate tag-bindings on the *current* quad, then
/// looks ahead in `sub` for another quad that projects to the same node
/// (stashing a non-matching lookahead quad for the following `next` call).
pub struct HasAIterator {
    store: MemoryStore,
    direction: Direction,
    sub: Box<dyn QueryIter>,
    current_node: Option<i64>,
    pending_quad: Option<i64>,
    id: u64,
}

impl std::fmt::Debug for HasAIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HasAIterator")
            .field("direction", &self.direction)
            .field("current_node", &self.current_node)
            .finish()
    }
}

impl HasAIterator {
    pub fn new(store: &MemoryStore, sub: Box<dyn QueryIter>, direction: Direction) -> Self {
        Self {
            store: store.clone(),
            direction,
            sub,
            current_node: None,
            pending_quad: None,
            id: next_iter_id(),
        }
    }

    fn next_quad(&mut self) -> Option<i64> {
        if let Some(q) = self.pending_quad.take() {
            return Some(q);
        }
        loop {
            if !self.sub.next() {
                return None;
            }
            if let Some(Ref::Quad(q)) = self.sub.result() {
                return Some(q);
            }
        }
    }
}

impl QueryIter for HasAIterator {
    fn next(&mut self) -> bool {
        loop {
            let Some(quad_id) = self.next_quad() else {
                self.current_node = None;
                return false;
            };
            let node = self.store.quad_direction(quad_id, self.direction);
            if node == 0 {
                continue;
            }
            self.current_node = Some(node);
            return true;
        }
    }

    fn result(&self) -> Option<Ref> {
        self.current_node.map(Ref::Node)
    }

    fn next_path(&mut self) -> bool {
        if self.sub.next_path() {
            return true;
        }
        let Some(target) = self.current_node else {
            return false;
        };
        match self.next_quad() {
            Some(q) if self.store.quad_direction(q, self.direction) == target => true,
            Some(q) => {
                self.pending_quad = Some(q);
                false
            }
            None => false,
        }
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
        let Ref::Node(node_id) = v else { return false };
        let mut scan = IndexScanIterator::new(&self.store, self.direction, node_id);
        while scan.next() {
            if let Some(quad_ref) = scan.result() {
                if self.sub.contains(quad_ref) {
                    self.current_node = Some(node_id);
                    return true;
                }
            }
        }
        false
    }

    fn stats(&self) -> IterStats {
        let sub = self.sub.stats();
        IterStats::estimate(sub.size, sub.next_cost, sub.contains_cost)
    }

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::FixedIterator;
    use pathgraph_model::{Quad, Value};

    #[test]
    fn projects_quads_onto_direction() {
        let store = MemoryStore::new();
        let (id, _) = store.add_quad(Quad::triple(
            Value::iri("alice"),
            Value::iri("follows"),
            Value::iri("bob"),
        ));
        let sub = Box::new(FixedIterator::singleton(Ref::Quad(id)));
        let mut has_a = HasAIterator::new(&store, sub, Direction::Subject);
        assert!(has_a.next());
        let alice = store.value_of(&Value::iri("alice"));
        assert_eq!(has_a.result(), Some(Ref::Node(alice)));
        assert!(!has_a.next());
    }
}
