use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

/// Where `append` places new records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Append at the tail (chat transcript)
    Chronological,
    /// Insert at the head (galleries)
    NewestFirst,
}

/// Append-only, session-scoped history.
///
/// Clones share the same underlying records, so a mode controller and the
/// view rendering it observe one sequence. Records are never edited or
/// removed once appended.
#[derive(Debug)]
pub struct History<T> {
    records: Arc<RwLock<VecDeque<T>>>,
    ordering: Ordering,
}

impl<T: Clone> History<T> {
    pub fn new(ordering: Ordering) -> Self {
        Self {
            records: Arc::new(RwLock::new(VecDeque::new())),
            ordering,
        }
    }

    pub fn chronological() -> Self {
        Self::new(Ordering::Chronological)
    }

    pub fn newest_first() -> Self {
        Self::new(Ordering::NewestFirst)
    }

    pub fn ordering(&self) -> Ordering {
        self.ordering
    }

    pub fn append(&self, record: T) {
        let mut records = self.records.write();
        match self.ordering {
            Ordering::Chronological => records.push_back(record),
            Ordering::NewestFirst => records.push_front(record),
        }
    }

    /// Snapshot in display order
    pub fn all(&self) -> Vec<T> {
        self.records.read().iter().cloned().collect()
    }

    pub fn first(&self) -> Option<T> {
        self.records.read().front().cloned()
    }

    pub fn last(&self) -> Option<T> {
        self.records.read().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            ordering: self.ordering,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronological_appends_at_tail() {
        let history = History::chronological();
        history.append(1);
        history.append(2);
        history.append(3);
        assert_eq!(history.all(), vec![1, 2, 3]);
        assert_eq!(history.first(), Some(1));
        assert_eq!(history.last(), Some(3));
    }

    #[test]
    fn test_newest_first_inserts_at_head() {
        let history = History::newest_first();
        history.append("a");
        history.append("b");
        assert_eq!(history.all(), vec!["b", "a"]);
    }

    #[test]
    fn test_clones_share_records() {
        let history = History::chronological();
        let view = history.clone();
        history.append(7);
        assert_eq!(view.len(), 1);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let history = History::chronological();
        history.append(1);
        let snapshot = history.all();
        history.append(2);
        assert_eq!(snapshot, vec![1]);
        assert_eq!(history.len(), 2);
    }
}
