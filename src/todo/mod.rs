//! Todo list panel.
//!
//! Plain CRUD over the local store: every change is saved immediately under
//! `retrodash_todos` and acknowledged with the short tone.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sound::NotificationSink;
use crate::storage::{Storage, StorageKey};
use crate::types::constants::TODO_MAX_CHARS;

/// One task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Creation time in epoch milliseconds, bumped to stay unique
    pub id: i64,
    /// Trimmed, non-empty, at most 80 characters
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// The todo collection and its persistence.
pub struct TodoList {
    items: Vec<Todo>,
    storage: Storage,
    sink: Arc<dyn NotificationSink>,
}

impl TodoList {
    /// Loads the stored list; a missing or corrupt one starts empty.
    pub fn load(storage: Storage, sink: Arc<dyn NotificationSink>) -> Self {
        let items: Vec<Todo> = storage.load_or_default(StorageKey::Todos);
        debug!(count = items.len(), "Todos loaded");
        Self {
            items,
            storage,
            sink,
        }
    }

    /// Adds a task. Blank text is rejected with no change; longer text is
    /// cut to the first 80 characters.
    ///
    /// Returns the new task's id.
    pub fn add(&mut self, text: &str, now: DateTime<Utc>) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let text: String = text.chars().take(TODO_MAX_CHARS).collect();

        let id = self.next_id(now.timestamp_millis());
        self.items.push(Todo {
            id,
            text,
            completed: false,
            created_at: now,
        });
        self.persist();
        self.sink.notify_short();

        debug!(id, "Todo added");
        Some(id)
    }

    /// Flips a task's completed flag. Returns false for unknown ids.
    pub fn toggle(&mut self, id: i64) -> bool {
        let Some(todo) = self.items.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        todo.completed = !todo.completed;
        self.persist();
        self.sink.notify_short();
        true
    }

    /// Removes a task. Returns false for unknown ids.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        self.sink.notify_short();
        true
    }

    /// Removes every completed task. Saves and chimes only when something
    /// was removed; returns how many were.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.completed);
        let removed = before - self.items.len();
        if removed > 0 {
            self.persist();
            self.sink.notify_short();
            debug!(removed, "Completed todos cleared");
        }
        removed
    }

    /// Empties the in-memory list without writing. Used by clear-all-data,
    /// which removes the stored key itself.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    /// The panel status, `completed/total`.
    pub fn status_label(&self) -> String {
        format!("{}/{}", self.completed_count(), self.len())
    }

    fn next_id(&self, candidate: i64) -> i64 {
        let max_existing = self.items.iter().map(|t| t.id).max();
        match max_existing {
            Some(max) if candidate <= max => max + 1,
            _ => candidate,
        }
    }

    fn persist(&self) {
        self.storage.save(StorageKey::Todos, &self.items);
    }
}

impl std::fmt::Debug for TodoList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoList")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{Chime, RecordingSink};
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn create_list() -> (TodoList, Arc<RecordingSink>, Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let sink = Arc::new(RecordingSink::new());
        let list = TodoList::load(storage.clone(), sink.clone());
        (list, sink, storage, dir)
    }

    #[test]
    fn test_add_trims_and_persists() {
        let (mut list, sink, storage, _dir) = create_list();

        let id = list.add("  write report  ", at(1_000)).unwrap();

        assert_eq!(id, 1_000);
        assert_eq!(list.items()[0].text, "write report");
        assert!(!list.items()[0].completed);
        assert_eq!(sink.chimes(), vec![Chime::Short]);

        let stored: Vec<Todo> = storage.load(StorageKey::Todos).unwrap();
        assert_eq!(stored, list.items());
    }

    #[test]
    fn test_add_blank_is_rejected() {
        let (mut list, sink, storage, _dir) = create_list();

        assert_eq!(list.add("   ", at(1)), None);
        assert_eq!(list.add("", at(1)), None);

        assert!(list.is_empty());
        assert!(sink.chimes().is_empty());
        assert!(!storage.path_for(StorageKey::Todos).exists());
    }

    #[test]
    fn test_add_truncates_to_limit() {
        let (mut list, _sink, _storage, _dir) = create_list();

        list.add(&"é".repeat(100), at(1));

        assert_eq!(list.items()[0].text.chars().count(), TODO_MAX_CHARS);
    }

    #[test]
    fn test_ids_stay_unique_within_one_millisecond() {
        let (mut list, _sink, _storage, _dir) = create_list();

        let a = list.add("a", at(5)).unwrap();
        let b = list.add("b", at(5)).unwrap();
        let c = list.add("c", at(4)).unwrap();

        assert_eq!((a, b, c), (5, 6, 7));
    }

    #[test]
    fn test_toggle() {
        let (mut list, _sink, _storage, _dir) = create_list();
        let id = list.add("a", at(1)).unwrap();

        assert!(list.toggle(id));
        assert!(list.items()[0].completed);
        assert_eq!(list.status_label(), "1/1");

        assert!(list.toggle(id));
        assert!(!list.items()[0].completed);

        assert!(!list.toggle(999));
    }

    #[test]
    fn test_delete() {
        let (mut list, sink, _storage, _dir) = create_list();
        let id = list.add("a", at(1)).unwrap();
        sink.clear();

        assert!(list.delete(id));
        assert!(list.is_empty());
        assert_eq!(sink.count(Chime::Short), 1);

        assert!(!list.delete(id));
        assert_eq!(sink.count(Chime::Short), 1);
    }

    #[test]
    fn test_clear_completed() {
        let (mut list, sink, storage, _dir) = create_list();
        let a = list.add("a", at(1)).unwrap();
        list.add("b", at(2)).unwrap();
        list.toggle(a);
        sink.clear();

        assert_eq!(list.clear_completed(), 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].text, "b");
        assert_eq!(sink.count(Chime::Short), 1);

        let stored: Vec<Todo> = storage.load(StorageKey::Todos).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_clear_completed_with_nothing_done_is_silent() {
        let (mut list, sink, _storage, _dir) = create_list();
        list.add("a", at(1)).unwrap();
        sink.clear();

        assert_eq!(list.clear_completed(), 0);
        assert!(sink.chimes().is_empty());
    }

    #[test]
    fn test_reload_restores_items() {
        let (mut list, sink, storage, _dir) = create_list();
        list.add("persisted", at(42)).unwrap();

        let reloaded = TodoList::load(storage, sink);
        assert_eq!(reloaded.items(), list.items());
    }

    #[test]
    fn test_wire_format() {
        let todo = Todo {
            id: 1,
            text: "x".to_string(),
            completed: true,
            created_at: at(0),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["completed"], true);
    }
}
