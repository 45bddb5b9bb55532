use pathgraph_model::Direction;
use pathgraph_store::{MemoryStore, QuadStore};

use crate::error::IterError;
use crate::primitive::IndexScanIterator;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::TagMap;

/// `LinksTo(sub, direction)`: promotes a set of node ids to the set of quads
/// referencing them in `direction`. When `sub` is a single fixed node the
/// optimizer rewrites this directly to `store.quad_iterator`; this iterator
/// is the general chained form, one `IndexScan` per node produced by `sub`.
pub struct LinksToIterator {
    store: MemoryStore,
    direction: Direction,
    sub: Box<dyn QueryIter>,
    scan: Option<IndexScanIterator>,
    current: Option<Ref>,
    id: u64,
}

impl std::fmt::Debug for LinksToIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinksToIterator")
            .field("direction", &self.direction)
            .field("current", &self.current)
            .finish()
    }
}

impl LinksToIterator {
    pub fn new(store: &MemoryStore, sub: Box<dyn QueryIter>, direction: Direction) -> Self {
        Self {
            store: store.clone(),
            direction,
            sub,
            scan: None,
            current: None,
            id: next_iter_id(),
        }
    }
}

impl QueryIter for LinksToIterator {
    fn next(&mut self) -> bool {
        loop {
            if let Some(scan) = self.scan.as_mut() {
                if scan.next() {
                    self.current = scan.result();
                    return true;
                }
            }
            if !self.sub.next() {
                self.scan = None;
                self.current = None;
                return false;
            }
            if let Some(Ref::Node(node_id)) = self.sub.result() {
                self.scan = Some(IndexScanIterator::new(&self.store, self.direction, node_id));
            }
        }
    }

    fn result(&self) -> Option<Ref> {
        self.current
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
        let Ref::Quad(id) = v else { return false };
        let node_id = self.store.quad_direction(id, self.direction);
        if node_id == 0 {
            return false;
        }
        if self.sub.contains(Ref::Node(node_id)) {
            self.current = Some(v);
            true
        } else {
            false
        }
    }

    fn stats(&self) -> IterStats {
        let store_stats = self.store.stats();
        IterStats::estimate(store_stats.quad_count.max(0) as u64, 2.0, 2.0)
    }

    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::FixedIterator;
    use pathgraph_store::QuadStore;
    use pathgraph_model::{Quad, Value};

    #[test]
    fn links_to_promotes_nodes_to_quads() {
        let store = MemoryStore::new();
        let (alice, _) = store.add_value(Value::iri("alice"));
        let (id, _) = store.add_quad(Quad::triple(
            Value::iri("alice"),
            Value::iri("follows"),
            Value::iri("bob"),
        ));
        let sub = Box::new(FixedIterator::singleton(Ref::Node(alice)));
        let mut links = LinksToIterator::new(&store, sub, Direction::Subject);
        assert!(links.next());
        assert_eq!(links.result(), Some(Ref::Quad(id)));
        assert!(!links.next());
    }
}
