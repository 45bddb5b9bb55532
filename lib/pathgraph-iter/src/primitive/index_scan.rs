use pathgraph_model::Direction;
use pathgraph_store::{IdIter, MemoryStore, QuadStore};

use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;

/// `IndexScan(tree)`: scans a single per-direction index bucket — every quad
/// id that references `value_id` in `direction`. Sorted ascending by quad
/// id. `contains` checks the quad's own direction pointer rather than
/// re-walking the bucket, an O(1) equivalent to "tree.get".
pub struct IndexScanIterator {
    store: MemoryStore,
    direction: Direction,
    value_id: i64,
    inner: IdIter,
    current: Option<i64>,
    size: u64,
    id: u64,
}

impl std::fmt::Debug for IndexScanIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexScanIterator")
            .field("direction", &self.direction)
            .field("value_id", &self.value_id)
            .field("current", &self.current)
            .field("size", &self.size)
            .finish()
    }
}

impl IndexScanIterator {
    pub fn new(store: &MemoryStore, direction: Direction, value_id: i64) -> Self {
        let size = store.direction_count(direction, value_id);
        Self {
            store: store.clone(),
            direction,
            value_id,
            inner: store.quad_iterator(direction, value_id),
            current: None,
            size,
            id: next_iter_id(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn value_id(&self) -> i64 {
        self.value_id
    }
}

impl QueryIter for IndexScanIterator {
    fn next(&mut self) -> bool {
        self.current = self.inner.next();
        self.current.is_some()
    }

    fn result(&self) -> Option<Ref> {
        self.current.map(Ref::Quad)
    }

    fn contains(&mut self, v: Ref) -> bool {
        let Ref::Quad(id) = v else { return false };
        if self.store.quad_direction(id, self.direction) == self.value_id {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    fn stats(&self) -> IterStats {
        IterStats::exact(self.size, 1.0, 1.0)
    }

    fn sorted(&self) -> bool {
        true
    }

    fn id(&self) -> u64 {
        self.id
    }
}
