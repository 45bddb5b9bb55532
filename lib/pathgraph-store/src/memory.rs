use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pathgraph_model::{CancellationToken, Direction, Quad, Value};
use rustc_hash::FxHashMap;

use crate::delta::{Action, ApplyOptions, Delta, DeltaErrorKind};
use crate::error::StoreError;
use crate::index::OrderedIndex;
use crate::iter::{IdIter, NodeIdIter, QuadIdIter};
use crate::primitive::Primitive;
use crate::store::{QuadStore, StoreStats};

/// A copy-on-write, append-only list of primitive ids in creation order.
///
/// A reader takes an `Arc` clone of the current list and is immune to later
/// pushes, because a push
/// never mutates the `Vec` a reader is holding — it clones it, appends, and
/// swaps in the new `Arc`. Ids are never reused, so the list never shrinks;
/// liveness at read time is checked against `prim` instead (tombstone skip).
#[derive(Default)]
struct CowIdList {
    ids: RwLock<Arc<Vec<i64>>>,
}

impl CowIdList {
    fn push(&self, id: i64) {
        let mut guard = self.ids.write().unwrap_or_else(|e| e.into_inner());
        let mut next = (**guard).clone();
        next.push(id);
        *guard = Arc::new(next);
    }

    fn snapshot(&self) -> Arc<Vec<i64>> {
        Arc::clone(&self.ids.read().unwrap_or_else(|e| e.into_inner()))
    }
}

struct Inner {
    /// Canonical value string -> value primitive id.
    vals: DashMap<String, i64>,
    /// (subject, predicate, object, label) id tuple -> quad primitive id.
    quads: DashMap<(i64, i64, i64, i64), i64>,
    /// Primitive id -> record. Shared by value and quad ids alike.
    prim: DashMap<i64, Primitive>,
    /// index[d]: value-primitive-id -> ordered set of quad ids referencing it in direction d.
    index: [DashMap<i64, OrderedIndex>; 4],
    nodes: CowIdList,
    quad_ids: CowIdList,
    last: AtomicI64,
    horizon: AtomicI64,
    node_count: AtomicI64,
    quad_count: AtomicI64,
}

/// The reference `QuadStore` implementation: an in-memory, interned,
/// four-index quadstore. Cheaply `Clone`-able (an `Arc` handle), so
/// iterators and readers can hold their own owned copy.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                vals: DashMap::new(),
                quads: DashMap::new(),
                prim: DashMap::new(),
                index: [
                    DashMap::new(),
                    DashMap::new(),
                    DashMap::new(),
                    DashMap::new(),
                ],
                nodes: CowIdList::default(),
                quad_ids: CowIdList::default(),
                last: AtomicI64::new(0),
                horizon: AtomicI64::new(0),
                node_count: AtomicI64::new(0),
                quad_count: AtomicI64::new(0),
            }),
        }
    }

    fn index_for(&self, ordinal: usize) -> &DashMap<i64, OrderedIndex> {
        &self.inner.index[ordinal]
    }

    fn next_id(&self) -> i64 {
        self.inner.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn try_resolve(&self, value: &Value) -> Option<i64> {
        self.inner.vals.get(&value.string_of()).map(|id| *id)
    }

    fn bump_refcount(&self, id: i64, delta: i64) {
        if let Some(mut entry) = self.inner.prim.get_mut(&id) {
            if let Primitive::Value { refcount, .. } = &mut *entry {
                *refcount += delta;
            }
        }
    }

    /// Removes a value primitive once its refcount drops to zero or below.
    fn maybe_collect_value(&self, id: i64) {
        let removed = self.inner.prim.remove_if(&id, |_, primitive| {
            matches!(primitive, Primitive::Value { refcount, .. } if *refcount <= 0)
        });
        if let Some((_, Primitive::Value { value, .. })) = removed {
            self.inner.vals.remove(&value.string_of());
            self.inner.node_count.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn rollback_refs(&self, dirs: [i64; 4]) {
        for id in dirs {
            if id != 0 {
                self.bump_refcount(id, -1);
                self.maybe_collect_value(id);
            }
        }
    }

    pub(crate) fn is_live_value(&self, id: i64) -> bool {
        matches!(self.inner.prim.get(&id).as_deref(), Some(Primitive::Value { .. }))
    }

    pub(crate) fn is_live_quad(&self, id: i64) -> bool {
        matches!(self.inner.prim.get(&id).as_deref(), Some(Primitive::Quad { .. }))
    }

    fn quad_exists(&self, quad: &Quad) -> bool {
        let Some(key) = self.resolve_key(quad) else {
            return false;
        };
        self.inner.quads.contains_key(&key)
    }

    /// Resolves a quad's four directions to already-interned ids without
    /// creating anything; `None` if any direction isn't interned yet.
    fn resolve_key(&self, quad: &Quad) -> Option<(i64, i64, i64, i64)> {
        let s = self.try_resolve(&quad.subject)?;
        let p = self.try_resolve(&quad.predicate)?;
        let o = self.try_resolve(&quad.object)?;
        let l = match &quad.label {
            Some(label) => self.try_resolve(label)?,
            None => 0,
        };
        Some((s, p, o, l))
    }

    fn delete_existing_quad(&self, quad: &Quad) -> bool {
        match self.resolve_key(quad).and_then(|key| self.inner.quads.get(&key).map(|id| *id)) {
            Some(id) => self.delete_quad(id),
            None => false,
        }
    }

    /// Walks the store's internal consistency invariants (index membership,
    /// refcount correctness, value round-tripping) and returns the first
    /// violation found, if any. A debugging/test aid, not part of the query
    /// surface.
    pub fn validate(&self) -> Result<(), StoreError> {
        for quad_id in self.all_quads_iterator() {
            let dirs = match self.inner.prim.get(&quad_id).as_deref() {
                Some(Primitive::Quad { dirs }) => *dirs,
                _ => {
                    return Err(StoreError::Internal(format!(
                        "quad {quad_id} missing from primitive table"
                    )))
                }
            };
            for (ordinal, &value_id) in dirs.iter().enumerate() {
                if value_id == 0 {
                    continue;
                }
                let present = self
                    .index_for(ordinal)
                    .get(&value_id)
                    .is_some_and(|index| index.get(quad_id));
                if !present {
                    return Err(StoreError::Internal(format!(
                        "quad {quad_id} missing from index[{ordinal}][{value_id}]"
                    )));
                }
            }
        }

        let mut live_refs: FxHashMap<i64, i64> = FxHashMap::default();
        for quad_id in self.all_quads_iterator() {
            if let Some(Primitive::Quad { dirs }) = self.inner.prim.get(&quad_id).as_deref() {
                for &value_id in dirs {
                    if value_id != 0 {
                        *live_refs.entry(value_id).or_insert(0) += 1;
                    }
                }
            }
        }

        for node_id in self.all_nodes_iterator() {
            let Some(Primitive::Value { value, refcount }) =
                self.inner.prim.get(&node_id).as_deref().cloned()
            else {
                return Err(StoreError::Internal(format!(
                    "node {node_id} missing from primitive table"
                )));
            };
            match self.inner.vals.get(&value.string_of()) {
                Some(mapped) if *mapped == node_id => {}
                _ => {
                    return Err(StoreError::Internal(format!(
                        "vals does not map {value:?} back to {node_id}"
                    )))
                }
            }
            let expected = live_refs.get(&node_id).copied().unwrap_or(0);
            if refcount != expected {
                return Err(StoreError::Internal(format!(
                    "node {node_id} has refcount {refcount} but {expected} live quads reference it"
                )));
            }
        }
        Ok(())
    }
}

impl QuadStore for MemoryStore {
    type NodeIds = NodeIdIter;
    type QuadIds = QuadIdIter;
    type DirectionIds = IdIter;

    fn add_value(&self, value: Value) -> (i64, bool) {
        let key = value.string_of();
        if let Some(existing) = self.inner.vals.get(&key) {
            let id = *existing;
            drop(existing);
            self.bump_refcount(id, 1);
            return (id, false);
        }
        let id = self.next_id();
        match self.inner.vals.entry(key) {
            Entry::Occupied(occupied) => {
                let existing_id = *occupied.get();
                self.bump_refcount(existing_id, 1);
                (existing_id, false)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(id);
                self.inner.prim.insert(
                    id,
                    Primitive::Value {
                        value,
                        refcount: 1,
                    },
                );
                self.inner.nodes.push(id);
                self.inner.node_count.fetch_add(1, Ordering::SeqCst);
                (id, true)
            }
        }
    }

    fn lookup_value(&self, id: i64) -> Value {
        match self.inner.prim.get(&id).as_deref() {
            Some(Primitive::Value { value, .. }) => value.clone(),
            _ => Value::blank_node(format!("n{id}")),
        }
    }

    fn add_quad(&self, quad: Quad) -> (i64, bool) {
        let (s, _) = self.add_value(quad.subject);
        let (p, _) = self.add_value(quad.predicate);
        let (o, _) = self.add_value(quad.object);
        let l = quad.label.map_or(0, |label| self.add_value(label).0);
        let dirs = [s, p, o, l];
        let key = (dirs[0], dirs[1], dirs[2], dirs[3]);

        if let Some(existing) = self.inner.quads.get(&key) {
            let existing_id = *existing;
            drop(existing);
            self.rollback_refs(dirs);
            return (existing_id, false);
        }

        let id = self.next_id();
        match self.inner.quads.entry(key) {
            Entry::Occupied(occupied) => {
                let existing_id = *occupied.get();
                self.rollback_refs(dirs);
                (existing_id, false)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(id);
                self.inner.prim.insert(id, Primitive::Quad { dirs });
                self.inner.quad_ids.push(id);
                self.inner.quad_count.fetch_add(1, Ordering::SeqCst);
                for (ordinal, &value_id) in dirs.iter().enumerate() {
                    if value_id != 0 {
                        self.index_for(ordinal).entry(value_id).or_default().set(id);
                    }
                }
                (id, true)
            }
        }
    }

    fn delete_quad(&self, id: i64) -> bool {
        let dirs = match self
            .inner
            .prim
            .remove_if(&id, |_, primitive| matches!(primitive, Primitive::Quad { .. }))
        {
            Some((_, Primitive::Quad { dirs })) => dirs,
            _ => return false,
        };
        self.inner.quads.remove(&(dirs[0], dirs[1], dirs[2], dirs[3]));
        self.inner.quad_count.fetch_sub(1, Ordering::SeqCst);
        for (ordinal, &value_id) in dirs.iter().enumerate() {
            if value_id == 0 {
                continue;
            }
            if let Some(mut index) = self.index_for(ordinal).get_mut(&value_id) {
                index.delete(id);
                let now_empty = index.is_empty();
                drop(index);
                if now_empty {
                    self.index_for(ordinal).remove(&value_id);
                }
            }
            self.bump_refcount(value_id, -1);
            self.maybe_collect_value(value_id);
        }
        true
    }

    fn apply_deltas(&self, deltas: &[Delta], options: ApplyOptions) -> Result<(), StoreError> {
        if !(options.ignore_duplicate && options.ignore_missing) {
            for delta in deltas {
                if options.cancelled() {
                    return Err(StoreError::Cancelled);
                }
                let ok = match delta.action {
                    Action::Add => options.ignore_duplicate || !self.quad_exists(&delta.quad),
                    Action::Delete => options.ignore_missing || self.quad_exists(&delta.quad),
                };
                if !ok {
                    let kind = match delta.action {
                        Action::Add => DeltaErrorKind::QuadExists,
                        Action::Delete => DeltaErrorKind::QuadNotExist,
                    };
                    return Err(StoreError::Delta {
                        delta: Box::new(delta.clone()),
                        kind,
                    });
                }
            }
        }

        for delta in deltas {
            if options.cancelled() {
                return Err(StoreError::Cancelled);
            }
            match delta.action {
                Action::Add => {
                    let (_, created) = self.add_quad(delta.quad.clone());
                    if !created && !options.ignore_duplicate {
                        return Err(StoreError::Delta {
                            delta: Box::new(delta.clone()),
                            kind: DeltaErrorKind::QuadExists,
                        });
                    }
                }
                Action::Delete => {
                    let existed = self.delete_existing_quad(&delta.quad);
                    if !existed && !options.ignore_missing {
                        return Err(StoreError::Delta {
                            delta: Box::new(delta.clone()),
                            kind: DeltaErrorKind::QuadNotExist,
                        });
                    }
                }
            }
        }

        self.inner.horizon.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn quad_iterator(&self, direction: Direction, value_id: i64) -> IdIter {
        let ordinal = direction.ordinal() as usize - 1;
        let cursor = self.index_for(ordinal).get(&value_id).map(|index| index.seek_first());
        IdIter(cursor)
    }

    fn all_nodes_iterator(&self) -> NodeIdIter {
        NodeIdIter {
            store: self.clone(),
            ids: self.inner.nodes.snapshot(),
            pos: 0,
        }
    }

    fn all_quads_iterator(&self) -> QuadIdIter {
        QuadIdIter {
            store: self.clone(),
            ids: self.inner.quad_ids.snapshot(),
            pos: 0,
        }
    }

    fn name_of(&self, id: i64) -> Value {
        self.lookup_value(id)
    }

    fn value_of(&self, value: &Value) -> i64 {
        self.try_resolve(value).unwrap_or(0)
    }

    fn quad(&self, id: i64) -> Option<Quad> {
        let dirs = match self.inner.prim.get(&id).as_deref() {
            Some(Primitive::Quad { dirs }) => *dirs,
            _ => return None,
        };
        let subject = self.lookup_value(dirs[0]);
        let predicate = self.lookup_value(dirs[1]);
        let object = self.lookup_value(dirs[2]);
        let label = if dirs[3] == 0 {
            None
        } else {
            Some(self.lookup_value(dirs[3]))
        };
        Some(Quad::new(subject, predicate, object, label))
    }

    fn quad_direction(&self, id: i64, direction: Direction) -> i64 {
        match self.inner.prim.get(&id).as_deref() {
            Some(Primitive::Quad { dirs }) => dirs[direction.ordinal() as usize - 1],
            _ => 0,
        }
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            node_count: self.inner.node_count.load(Ordering::SeqCst),
            quad_count: self.inner.quad_count.load(Ordering::SeqCst),
            horizon: self.inner.horizon.load(Ordering::SeqCst),
        }
    }

    fn contains_node(&self, id: i64) -> bool {
        self.is_live_value(id)
    }

    fn contains_quad(&self, id: i64) -> bool {
        self.is_live_quad(id)
    }

    fn direction_count(&self, direction: Direction, value_id: i64) -> u64 {
        let ordinal = direction.ordinal() as usize - 1;
        self.index_for(ordinal)
            .get(&value_id)
            .map_or(0, |index| index.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathgraph_model::Value;

    fn v(s: &str) -> Value {
        Value::iri(s)
    }

    #[test]
    fn add_value_interns_once() {
        let store = MemoryStore::new();
        let (id1, created1) = store.add_value(v("http://example.com/a"));
        let (id2, created2) = store.add_value(v("http://example.com/a"));
        assert!(created1);
        assert!(!created2);
        assert_eq!(id1, id2);
    }

    #[test]
    fn add_quad_is_idempotent_on_refcount() {
        let store = MemoryStore::new();
        let q = Quad::triple(v("a"), v("follows"), v("b"));
        let (id1, created1) = store.add_quad(q.clone());
        let (id2, created2) = store.add_quad(q);
        assert!(created1);
        assert!(!created2);
        assert_eq!(id1, id2);
        assert_eq!(store.stats().quad_count, 1);
        store.validate().unwrap();
    }

    #[test]
    fn delete_quad_collects_orphaned_values() {
        let store = MemoryStore::new();
        let q = Quad::triple(v("a"), v("follows"), v("b"));
        let (id, _) = store.add_quad(q);
        assert_eq!(store.stats().node_count, 3);
        assert!(store.delete_quad(id));
        assert_eq!(store.stats().node_count, 0);
        assert_eq!(store.stats().quad_count, 0);
        store.validate().unwrap();
    }

    #[test]
    fn delete_quad_keeps_shared_values_alive() {
        let store = MemoryStore::new();
        store.add_quad(Quad::triple(v("a"), v("follows"), v("b")));
        let (id2, _) = store.add_quad(Quad::triple(v("a"), v("follows"), v("c")));
        store.delete_quad(id2);
        assert_eq!(store.stats().node_count, 3); // a, follows, b survive
        store.validate().unwrap();
    }

    #[test]
    fn add_then_delete_round_trips_stats() {
        let store = MemoryStore::new();
        let before = store.stats();
        let (id, _) = store.add_quad(Quad::triple(v("a"), v("follows"), v("b")));
        store.delete_quad(id);
        let after = store.stats();
        assert_eq!(before.node_count, after.node_count);
        assert_eq!(before.quad_count, after.quad_count);
    }

    #[test]
    fn quad_iterator_reflects_index() {
        let store = MemoryStore::new();
        let (alice, _) = store.add_value(v("alice"));
        store.add_quad(Quad::triple(v("alice"), v("follows"), v("bob")));
        let ids: Vec<_> = store.quad_iterator(Direction::Subject, alice).collect();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn quad_iterator_on_unknown_value_is_empty() {
        let store = MemoryStore::new();
        let ids: Vec<_> = store.quad_iterator(Direction::Subject, 9999).collect();
        assert!(ids.is_empty());
    }

    #[test]
    fn name_of_value_of_round_trip() {
        let store = MemoryStore::new();
        let value = v("http://example.com/x");
        let (id, _) = store.add_value(value.clone());
        assert_eq!(store.name_of(id), value);
        assert_eq!(store.value_of(&value), id);
    }

    #[test]
    fn apply_deltas_precheck_rejects_duplicate_add() {
        let store = MemoryStore::new();
        let q = Quad::triple(v("a"), v("follows"), v("b"));
        store.add_quad(q.clone());
        let result = store.apply_deltas(&[Delta::add(q)], ApplyOptions::new());
        assert!(matches!(result, Err(StoreError::Delta { .. })));
    }

    #[test]
    fn apply_deltas_ignore_duplicate_is_noop() {
        let store = MemoryStore::new();
        let q = Quad::triple(v("a"), v("follows"), v("b"));
        store.add_quad(q.clone());
        let result = store.apply_deltas(
            &[Delta::add(q)],
            ApplyOptions::new().ignore_duplicate(true),
        );
        assert!(result.is_ok());
        assert_eq!(store.stats().quad_count, 1);
    }

    #[test]
    fn apply_deltas_reports_cancelled_when_precancelled() {
        let store = MemoryStore::new();
        let token = CancellationToken::new();
        token.cancel();
        let deltas = vec![Delta::add(Quad::triple(v("a"), v("follows"), v("b")))];
        let result = store.apply_deltas(&deltas, ApplyOptions::new().cancellation(token));
        assert!(matches!(result, Err(StoreError::Cancelled)));
        assert_eq!(store.stats().quad_count, 0);
    }

    #[test]
    fn apply_deltas_advances_horizon_once_per_batch() {
        let store = MemoryStore::new();
        let deltas = vec![
            Delta::add(Quad::triple(v("a"), v("follows"), v("b"))),
            Delta::add(Quad::triple(v("b"), v("follows"), v("c"))),
        ];
        store.apply_deltas(&deltas, ApplyOptions::new()).unwrap();
        assert_eq!(store.stats().horizon, 1);
    }

    #[test]
    fn reverse_deltas_restore_initial_state() {
        let store = MemoryStore::new();
        let q = Quad::triple(v("a"), v("follows"), v("b"));
        let before = store.stats();
        store
            .apply_deltas(&[Delta::add(q.clone())], ApplyOptions::new())
            .unwrap();
        store
            .apply_deltas(&[Delta::delete(q)], ApplyOptions::new())
            .unwrap();
        let after = store.stats();
        assert_eq!(before.node_count, after.node_count);
        assert_eq!(before.quad_count, after.quad_count);
        assert_eq!(after.horizon, before.horizon + 2);
    }

    #[test]
    fn empty_store_has_no_nodes_or_quads() {
        let store = MemoryStore::new();
        assert_eq!(store.all_nodes_iterator().count(), 0);
        assert_eq!(store.all_quads_iterator().count(), 0);
    }
}
