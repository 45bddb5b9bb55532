use std::collections::BTreeSet;
use std::ops::Bound;
use std::sync::Arc;

/// The ordered per-(direction, value) container: a sorted set of
/// quad-primitive ids supporting point lookup, insert, delete, length and
/// seek-based enumeration, all in O(log n).
///
/// Backed by a copy-on-write `Arc<BTreeSet<i64>>` rather than a raw
/// `BTreeSet`: a [`CursorEnumerator`] clones the `Arc` cheaply and is immune
/// to concurrent mutation of the index it was taken from — writers clone the
/// underlying set rather than mutate a version a live enumerator might be
/// reading.
#[derive(Debug, Clone, Default)]
pub struct OrderedIndex {
    data: Arc<BTreeSet<i64>>,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: i64) {
        Arc::make_mut(&mut self.data).insert(key);
    }

    /// Removes `key` if present; returns whether it was present. No error if absent.
    pub fn delete(&mut self, key: i64) -> bool {
        Arc::make_mut(&mut self.data).remove(&key)
    }

    pub fn get(&self, key: i64) -> bool {
        self.data.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// An enumerator positioned before the smallest key.
    pub fn seek_first(&self) -> CursorEnumerator {
        CursorEnumerator {
            data: Arc::clone(&self.data),
            lower_bound: Bound::Unbounded,
            done: false,
        }
    }

    /// An enumerator positioned before the first key `>= key`.
    pub fn seek(&self, key: i64) -> CursorEnumerator {
        CursorEnumerator {
            data: Arc::clone(&self.data),
            lower_bound: Bound::Included(key),
            done: false,
        }
    }
}

/// A single-producer enumerator over a frozen snapshot of an [`OrderedIndex`].
pub struct CursorEnumerator {
    data: Arc<BTreeSet<i64>>,
    lower_bound: Bound<i64>,
    done: bool,
}

impl CursorEnumerator {
    /// Yields the current key and advances past it; `None` at EOF.
    pub fn next(&mut self) -> Option<i64> {
        if self.done {
            return None;
        }
        let found = match self.lower_bound {
            Bound::Unbounded => self.data.iter().next().copied(),
            Bound::Included(key) => self.data.range(key..).next().copied(),
            Bound::Excluded(key) => self
                .data
                .range((Bound::Excluded(key), Bound::Unbounded))
                .next()
                .copied(),
        };
        match found {
            Some(key) => {
                self.lower_bound = Bound::Excluded(key);
                Some(key)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_first_yields_ascending() {
        let mut index = OrderedIndex::new();
        for k in [5, 1, 3, 2, 4] {
            index.set(k);
        }
        let mut cursor = index.seek_first();
        let mut seen = Vec::new();
        while let Some(k) = cursor.next() {
            seen.push(k);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn seek_starts_at_first_geq() {
        let mut index = OrderedIndex::new();
        for k in [10, 20, 30] {
            index.set(k);
        }
        let mut cursor = index.seek(15);
        assert_eq!(cursor.next(), Some(20));
        assert_eq!(cursor.next(), Some(30));
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn delete_is_noop_when_absent() {
        let mut index = OrderedIndex::new();
        assert!(!index.delete(1));
        index.set(1);
        assert!(index.delete(1));
        assert!(!index.delete(1));
    }

    #[test]
    fn enumerator_is_immune_to_later_mutation() {
        let mut index = OrderedIndex::new();
        index.set(1);
        index.set(2);
        let mut cursor = index.seek_first();
        index.set(3);
        index.delete(1);
        let mut seen = Vec::new();
        while let Some(k) = cursor.next() {
            seen.push(k);
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
