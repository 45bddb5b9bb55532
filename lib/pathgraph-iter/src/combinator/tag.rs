use crate::error::IterError;
use crate::query_iter::{next_iter_id, IterStats, QueryIter};
use crate::reference::Ref;
use crate::tag::{TagMap, Tagger};

/// Wraps `sub`, binding its current result under every name in `tagger`
/// (the `tag(names)` morphism) in addition to whatever tags `sub` already
/// carries.
#[derive(Debug)]
pub struct TagIterator {
    sub: Box<dyn QueryIter>,
    tagger: Tagger,
    id: u64,
}

impl TagIterator {
    pub fn new(sub: Box<dyn QueryIter>, tagger: Tagger) -> Self {
        Self {
            sub,
            tagger,
            id: next_iter_id(),
        }
    }
}

impl QueryIter for TagIterator {
    fn next(&mut self) -> bool {
        self.sub.next()
    }

    fn result(&self) -> Option<Ref> {
        self.sub.result()
    }

    fn next_path(&mut self) -> bool {
        self.sub.next_path()
    }

    fn tag_results(&self, out: &mut TagMap) {
        if let Some(r) = self.sub.result() {
            self.tagger.write(r, out);
        }
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
        self.sub.stats()
    }

    fn sorted(&self) -> bool {
        self.sub.sorted()
    }

    fn id(&self) -> u64 {
        self.id
    }
}
