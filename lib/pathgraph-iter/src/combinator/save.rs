use pathgraph_model::Direction;
use pathgraph_store::{MemoryStore, QuadStore};

use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::{TagMap, TagValue};

/// `Save(sub, predicate?, tag, anchor, project, optional?)`, folded with
/// `pathgraph-path`'s `save_predicates` morphism: for each node `sub`
/// produces, scans quads anchored on it via `anchor` and binds every
/// `project`-direction value under `tag`, without changing the top-level
/// result (still the node itself). `predicate` narrows the scan to edges of
/// one predicate (`save(pred, tag)`); when absent every edge counts
/// (`save_predicates`). `optional` still yields the node when no match
/// exists.
pub struct SaveIterator {
    store: MemoryStore,
    sub: Box<dyn QueryIter>,
    predicate: Option<i64>,
    anchor: Direction,
    project: Direction,
    tag: String,
    optional: bool,
    current_node: Option<i64>,
    matches: Vec<i64>,
    match_pos: usize,
    current_tag: Option<i64>,
    id: u64,
}

impl std::fmt::Debug for SaveIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveIterator")
            .field("tag", &self.tag)
            .field("anchor", &self.anchor)
            .field("project", &self.project)
            .field("optional", &self.optional)
            .field("current_node", &self.current_node)
            .finish()
    }
}

impl SaveIterator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: &MemoryStore,
        sub: Box<dyn QueryIter>,
        predicate: Option<i64>,
        anchor: Direction,
        project: Direction,
        tag: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self {
            store: store.clone(),
            sub,
            predicate,
            anchor,
            project,
            tag: tag.into(),
            optional,
            current_node: None,
            matches: Vec::new(),
            match_pos: 0,
            current_tag: None,
            id: next_iter_id(),
        }
    }

    fn compute_matches(&self, node_id: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut scan = self.store.quad_iterator(self.anchor, node_id);
        while let Some(quad_id) = scan.next() {
            if let Some(predicate) = self.predicate {
                if self.store.quad_direction(quad_id, Direction::Predicate) != predicate {
                    continue;
                }
            }
            out.push(self.store.quad_direction(quad_id, self.project));
        }
        out
    }
}

impl QueryIter for SaveIterator {
    fn next(&mut self) -> bool {
        loop {
            if !self.sub.next() {
                return false;
            }
            let Some(Ref::Node(node_id)) = self.sub.result() else {
                continue;
            };
            self.current_node = Some(node_id);
            self.matches = self.compute_matches(node_id);
            if self.matches.is_empty() {
                self.match_pos = 0;
                self.current_tag = None;
                if self.optional {
                    return true;
                }
                continue;
            }
            self.current_tag = Some(self.matches[0]);
            self.match_pos = 1;
            return true;
        }
    }

    fn result(&self) -> Option<Ref> {
        self.current_node.map(Ref::Node)
    }

    fn next_path(&mut self) -> bool {
        if self.match_pos < self.matches.len() {
            self.current_tag = Some(self.matches[self.match_pos]);
            self.match_pos += 1;
            return true;
        }
        self.sub.next_path()
    }

    fn tag_results(&self, out: &mut TagMap) {
        self.sub.tag_results(out);
        if let Some(other) = self.current_tag {
            out.insert(self.tag.clone(), TagValue::Ref(Ref::Node(other)));
        }
    }

    fn err(&self) -> Option<&IterError> {
        self.sub.err()
    }

    fn close(&mut self) {
        self.sub.close();
    }

    fn contains(&mut self, v: Ref) -> bool {
        let Ref::Node(node_id) = v else { return false };
        if !self.sub.contains(v) {
            return false;
        }
        self.current_node = Some(node_id);
        self.matches = self.compute_matches(node_id);
        if self.matches.is_empty() {
            self.match_pos = 0;
            self.current_tag = None;
            self.optional
        } else {
            self.current_tag = Some(self.matches[0]);
            self.match_pos = 1;
            true
        }
    }

    fn stats(&self) -> IterStats {
        self.sub.stats()
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
    fn saves_related_value_under_tag() {
        let store = MemoryStore::new();
        let (alice, _) = store.add_value(Value::iri("alice"));
        store.add_quad(Quad::triple(
            Value::iri("alice"),
            Value::iri("status"),
            Value::iri("cool"),
        ));
        let (pred, _) = store.add_value(Value::iri("status"));
        let sub = Box::new(FixedIterator::singleton(Ref::Node(alice)));
        let mut save = SaveIterator::new(
            &store,
            sub,
            Some(pred),
            Direction::Subject,
            Direction::Object,
            "s",
            false,
        );
        assert!(save.next());
        let mut tags = TagMap::default();
        save.tag_results(&mut tags);
        let cool = store.value_of(&Value::iri("cool"));
        assert_eq!(tags.get("s"), Some(&TagValue::Ref(Ref::Node(cool))));
    }

    #[test]
    fn optional_yields_without_binding() {
        let store = MemoryStore::new();
        let (alice, _) = store.add_value(Value::iri("alice"));
        let (pred, _) = store.add_value(Value::iri("status"));
        let sub = Box::new(FixedIterator::singleton(Ref::Node(alice)));
        let mut save = SaveIterator::new(
            &store,
            sub,
            Some(pred),
            Direction::Subject,
            Direction::Object,
            "s",
            true,
        );
        assert!(save.next());
        let mut tags = TagMap::default();
        save.tag_results(&mut tags);
        assert!(!tags.contains_key("s"));
    }

    #[test]
    fn non_optional_skips_nodes_without_binding() {
        let store = MemoryStore::new();
        let (alice, _) = store.add_value(Value::iri("alice"));
        let (pred, _) = store.add_value(Value::iri("status"));
        let sub = Box::new(FixedIterator::singleton(Ref::Node(alice)));
        let mut save = SaveIterator::new(
            &store,
            sub,
            Some(pred),
            Direction::Subject,
            Direction::Object,
            "s",
            false,
        );
        assert!(!save.next());
    }

    #[test]
    fn absent_predicate_saves_every_related_value() {
        let store = MemoryStore::new();
        let (alice, _) = store.add_value(Value::iri("alice"));
        store.add_quad(Quad::triple(
            Value::iri("alice"),
            Value::iri("follows"),
            Value::iri("bob"),
        ));
        store.add_quad(Quad::triple(
            Value::iri("alice"),
            Value::iri("status"),
            Value::iri("cool"),
        ));
        let sub = Box::new(FixedIterator::singleton(Ref::Node(alice)));
        let mut save = SaveIterator::new(
            &store,
            sub,
            None,
            Direction::Subject,
            Direction::Predicate,
            "p",
            false,
        );
        let mut seen = Vec::new();
        assert!(save.next());
        let mut tags = TagMap::default();
        save.tag_results(&mut tags);
        seen.push(tags.get("p").copied());
        while save.next_path() {
            let mut tags = TagMap::default();
            save.tag_results(&mut tags);
            seen.push(tags.get("p").copied());
        }
        assert_eq!(seen.len(), 2);
    }
}
