use pathgraph_model::CancellationToken;
use pathgraph_store::{MemoryStore, QuadStore};

use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;

/// Which flavor of primitive an [`AllIterator`] enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AllKind {
    Nodes,
    Quads,
}

/// `All(range)`: every live primitive id in `[1..last]`, node- or
/// quad-flavored. Exact size, next_cost 1.
pub struct AllIterator {
    kind: AllKind,
    store: MemoryStore,
    inner: Box<dyn Iterator<Item = i64>>,
    current: Option<i64>,
    size: u64,
    id: u64,
    cancellation: CancellationToken,
    err: Option<IterError>,
}

impl std::fmt::Debug for AllIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllIterator")
            .field("kind", &self.kind)
            .field("current", &self.current)
            .field("size", &self.size)
            .field("id", &self.id)
            .finish()
    }
}

impl AllIterator {
    /// All live node (value primitive) ids.
    pub fn nodes(store: &MemoryStore) -> Self {
        let size = store.stats().node_count.max(0) as u64;
        Self {
            kind: AllKind::Nodes,
            store: store.clone(),
            inner: Box::new(store.all_nodes_iterator()),
            current: None,
            size,
            id: next_iter_id(),
            cancellation: CancellationToken::default(),
            err: None,
        }
    }

    /// All live quad (edge) ids.
    pub fn quads(store: &MemoryStore) -> Self {
        let size = store.stats().quad_count.max(0) as u64;
        Self {
            kind: AllKind::Quads,
            store: store.clone(),
            inner: Box::new(store.all_quads_iterator()),
            current: None,
            size,
            id: next_iter_id(),
            cancellation: CancellationToken::default(),
            err: None,
        }
    }

    /// Attaches a cancellation handle this scan polls on every `next`/
    /// `contains`, latching [`IterError::Cancelled`] once it trips.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    fn wrap(&self, id: i64) -> Ref {
        match self.kind {
            AllKind::Nodes => Ref::Node(id),
            AllKind::Quads => Ref::Quad(id),
        }
    }
}

impl QueryIter for AllIterator {
    fn next(&mut self) -> bool {
        if self.err.is_some() {
            return false;
        }
        if self.cancellation.is_cancelled() {
            self.err = Some(IterError::Cancelled);
            return false;
        }
        self.current = self.inner.next();
        self.current.is_some()
    }

    fn result(&self) -> Option<Ref> {
        self.current.map(|id| self.wrap(id))
    }

    fn err(&self) -> Option<&IterError> {
        self.err.as_ref()
    }

    fn contains(&mut self, v: Ref) -> bool {
        if self.err.is_some() {
            return false;
        }
        if self.cancellation.is_cancelled() {
            self.err = Some(IterError::Cancelled);
            return false;
        }
        let found = match (self.kind, v) {
            (AllKind::Nodes, Ref::Node(id)) => self.store.contains_node(id),
            (AllKind::Quads, Ref::Quad(id)) => self.store.contains_quad(id),
            _ => false,
        };
        if found {
            self.current = Some(v.id());
        }
        found
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

#[cfg(test)]
mod tests {
    use super::*;
    use pathgraph_model::{Quad, Value};

    #[test]
    fn all_nodes_enumerates_every_live_value() {
        let store = MemoryStore::new();
        store.add_quad(Quad::triple(
            Value::iri("a"),
            Value::iri("follows"),
            Value::iri("b"),
        ));
        let mut iter = AllIterator::nodes(&store);
        let mut seen = 0;
        while iter.next() {
            seen += 1;
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn all_quads_contains_live_id_only() {
        let store = MemoryStore::new();
        let (id, _) = store.add_quad(Quad::triple(
            Value::iri("a"),
            Value::iri("follows"),
            Value::iri("b"),
        ));
        let mut iter = AllIterator::quads(&store);
        assert!(iter.contains(Ref::Quad(id)));
        assert!(!iter.contains(Ref::Quad(id + 1000)));
        assert!(!iter.contains(Ref::Node(id)));
    }

    #[test]
    fn cancellation_stops_the_scan_and_latches_an_error() {
        let store = MemoryStore::new();
        store.add_quad(Quad::triple(
            Value::iri("a"),
            Value::iri("follows"),
            Value::iri("b"),
        ));
        let token = pathgraph_model::CancellationToken::new();
        token.cancel();
        let mut iter = AllIterator::nodes(&store).with_cancellation(token);
        assert!(!iter.next());
        assert!(matches!(iter.err(), Some(IterError::Cancelled)));
    }
}
