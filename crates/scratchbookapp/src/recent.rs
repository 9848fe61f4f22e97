use serde::Serialize;

use crate::model::{MAX_RECENT_NOTES, SCRATCH_PATH};

/// Most-recent-first list of opened note paths.
///
/// Entries are unique and the list never grows past its capacity. Paths of
/// deleted notes are left in place; consumers filter against the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentNotes {
    paths: Vec<String>,
    #[serde(skip)]
    capacity: usize,
}

impl Default for RecentNotes {
    fn default() -> Self {
        Self::new(SCRATCH_PATH, MAX_RECENT_NOTES)
    }
}

impl RecentNotes {
    /// A list seeded with `initial`. A zero capacity is treated as one.
    pub fn new(initial: &str, capacity: usize) -> Self {
        Self {
            paths: vec![initial.to_string()],
            capacity: capacity.max(1),
        }
    }

    pub fn touch(&mut self, path: &str) {
        self.paths.retain(|p| p != path);
        self.paths.insert(0, path.to_string());
        self.paths.truncate(self.capacity);
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn starts_with_scratch() {
        let recent = RecentNotes::default();
        assert_eq!(recent.paths(), &[SCRATCH_PATH.to_string()]);
    }

    #[test]
    fn touch_moves_existing_entry_to_front() {
        let mut recent = RecentNotes::default();
        recent.touch("a.txt");
        recent.touch("b.txt");
        recent.touch(SCRATCH_PATH);
        assert_eq!(recent.paths(), &[SCRATCH_PATH, "b.txt", "a.txt"]);
    }

    #[test]
    fn bounded_and_unique_under_long_sequences() {
        let mut recent = RecentNotes::default();
        for i in 0..350 {
            recent.touch(&format!("note-{}.txt", i % 130));
        }
        assert_eq!(recent.len(), MAX_RECENT_NOTES);
        let unique: HashSet<_> = recent.paths().iter().collect();
        assert_eq!(unique.len(), recent.len());
        assert_eq!(recent.paths()[0], "note-89.txt");
        assert_eq!(recent.paths()[1], "note-88.txt");
    }

    #[test]
    fn custom_capacity_truncates_oldest() {
        let mut recent = RecentNotes::new(SCRATCH_PATH, 2);
        recent.touch("a.txt");
        recent.touch("b.txt");
        assert_eq!(recent.paths(), &["b.txt", "a.txt"]);
        assert!(!recent.contains(SCRATCH_PATH));
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut recent = RecentNotes::default();
        recent.touch("a.txt");
        let json = serde_json::to_string(&recent).unwrap();
        assert_eq!(json, r#"["a.txt","scratch.txt"]"#);
    }
}
