use crate::index::CursorEnumerator;
use crate::memory::MemoryStore;

/// The result of [`MemoryStore::quad_iterator`]: every quad id in one
/// per-direction index bucket, ascending, or nothing if the bucket doesn't
/// exist.
pub struct IdIter(pub(crate) Option<CursorEnumerator>);

impl Iterator for IdIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.0.as_mut().and_then(CursorEnumerator::next)
    }
}

/// Ascending, tombstone-skipping enumeration of every live value primitive
/// id, backing `all_nodes_iterator`.
pub struct NodeIdIter {
    pub(crate) store: MemoryStore,
    pub(crate) ids: std::sync::Arc<Vec<i64>>,
    pub(crate) pos: usize,
}

impl Iterator for NodeIdIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        while self.pos < self.ids.len() {
            let id = self.ids[self.pos];
            self.pos += 1;
            if self.store.is_live_value(id) {
                return Some(id);
            }
        }
        None
    }
}

/// Ascending, tombstone-skipping enumeration of every live quad primitive
/// id, backing `all_quads_iterator`.
pub struct QuadIdIter {
    pub(crate) store: MemoryStore,
    pub(crate) ids: std::sync::Arc<Vec<i64>>,
    pub(crate) pos: usize,
}

impl Iterator for QuadIdIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        while self.pos < self.ids.len() {
            let id = self.ids[self.pos];
            self.pos += 1;
            if self.store.is_live_quad(id) {
                return Some(id);
            }
        }
        None
    }
}
