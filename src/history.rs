use crate::types::{EntryId, HistoryEntry};

/// Session history, oldest first. Unbounded until `clear` is called.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Removes the entry with `id`. Returns `None` if it is already gone.
    pub fn remove(&mut self, id: EntryId) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order, most recent last.
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries most recent first, as the history panel shows them.
    pub fn recent_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn get(&self, id: EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HttpMethod, Request, Response};
    use std::time::SystemTime;

    fn entry(id: u64, url: &str) -> HistoryEntry {
        HistoryEntry::new(
            EntryId(id),
            Request::new(HttpMethod::Get, url, Vec::new(), None),
            Response::Failure {
                message: "unreachable".to_string(),
                elapsed_ms: 0.0,
            },
            SystemTime::now(),
        )
    }

    fn urls(history: &History) -> Vec<&str> {
        history.list().iter().map(|e| e.request().url()).collect()
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut history = History::new();
        history.append(entry(1, "https://a.test"));
        history.append(entry(2, "https://b.test"));
        history.append(entry(3, "https://c.test"));

        assert_eq!(urls(&history), ["https://a.test", "https://b.test", "https://c.test"]);
        let recent: Vec<_> = history.recent_first().map(|e| e.id()).collect();
        assert_eq!(recent, [EntryId(3), EntryId(2), EntryId(1)]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut history = History::new();
        history.append(entry(1, "https://a.test"));
        history.append(entry(2, "https://b.test"));

        let removed = history.remove(EntryId(1)).unwrap();
        assert_eq!(removed.request().url(), "https://a.test");
        assert_eq!(urls(&history), ["https://b.test"]);
        assert!(history.get(EntryId(1)).is_none());
        assert!(history.get(EntryId(2)).is_some());
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut history = History::new();
        history.append(entry(1, "https://a.test"));

        assert!(history.remove(EntryId(1)).is_some());
        assert!(history.remove(EntryId(1)).is_none());
        assert!(history.remove(EntryId(42)).is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_empties_store() {
        let mut history = History::new();
        history.append(entry(1, "https://a.test"));
        history.append(entry(2, "https://b.test"));

        history.clear();
        assert_eq!(history.len(), 0);
        assert!(history.list().is_empty());
    }
}
