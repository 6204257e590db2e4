//! The ordered, in-memory snippet collection and its persistence rules.
//!
//! Every mutating call writes the whole collection back through the storage
//! collaborator. A failed write keeps the in-memory change, marks the
//! repository dirty and reports a storage error; the next mutation (or an
//! explicit [`SnippetRepository::flush`]) writes the full snapshot again.

use crate::error::{ObsnippetsError, Result};
use crate::models::{Category, Snippet, SnippetId};
use crate::storage::SnippetStorage;
use serde_json::Value;
use tracing::{debug, info, warn};

pub struct SnippetRepository {
    snippets: Vec<Snippet>,
    storage: Box<dyn SnippetStorage>,
    dirty: bool,
}

impl SnippetRepository {
    /// Load the collection from `storage`. Nothing stored yet means an empty
    /// repository.
    pub fn open(storage: impl SnippetStorage + 'static) -> Result<Self> {
        let (snippets, rejected) = match storage.load()? {
            Some(value) => decode(value),
            None => (Vec::new(), 0),
        };

        // The next save rewrites the whole store, so keep what could not be read
        if rejected > 0 {
            match storage.backup() {
                Ok(Some(copy)) => warn!(rejected, %copy, "kept a copy of the unreadable snippets"),
                Ok(None) => warn!(rejected, "unreadable snippets will be dropped on next save"),
                Err(err) => warn!(rejected, error = %err, "could not back up the snippet store"),
            }
        }

        for snippet in &snippets {
            if let Err(reason) = snippet.validate() {
                warn!(id = %snippet.id, name = %snippet.name, %reason, "loaded invalid snippet");
            }
        }
        info!(count = snippets.len(), "loaded snippets");

        Ok(Self {
            snippets,
            storage: Box::new(storage),
            dirty: false,
        })
    }

    pub fn list(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn get(&self, id: SnippetId) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Snippets of one category, in collection order.
    pub fn filter_by_category(&self, category: Category) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Append a snippet and persist.
    pub fn add(&mut self, snippet: Snippet) -> Result<()> {
        snippet.validate()?;
        debug!(id = %snippet.id, name = %snippet.name, "adding snippet");
        self.snippets.push(snippet);
        self.persist()
    }

    /// Replace the snippet with `target` in place. The replacement takes over
    /// the target's id.
    pub fn update(&mut self, target: SnippetId, mut replacement: Snippet) -> Result<()> {
        replacement.validate()?;
        let index = self.position(target)?;
        replacement.id = target;
        debug!(id = %target, index, "updating snippet");
        self.snippets[index] = replacement;
        self.persist()
    }

    /// Remove the snippet with `target` and persist. Returns what was removed.
    pub fn remove(&mut self, target: SnippetId) -> Result<Snippet> {
        let index = self.position(target)?;
        let removed = self.snippets.remove(index);
        debug!(id = %target, index, "removed snippet");
        self.persist()?;
        Ok(removed)
    }

    /// Whether the stored copy is behind the in-memory one.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the current snapshot again, e.g. after a failed save.
    pub fn flush(&mut self) -> Result<()> {
        self.persist()
    }

    fn position(&self, id: SnippetId) -> Result<usize> {
        self.snippets
            .iter()
            .position(|s| s.id == id)
            .ok_or(ObsnippetsError::NotFound(id))
    }

    fn persist(&mut self) -> Result<()> {
        let value = serde_json::to_value(&self.snippets)?;
        match self.storage.save(&value) {
            Ok(()) => {
                if self.dirty {
                    info!("snippet storage caught up after earlier failure");
                }
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                warn!(error = %err, "failed to save snippets, keeping changes in memory");
                Err(match err {
                    ObsnippetsError::Storage(message) => ObsnippetsError::Storage(message),
                    other => ObsnippetsError::Storage(other.to_string()),
                })
            }
        }
    }
}

// Decode record by record so one bad entry costs only itself. Returns the
// snippets and how many stored entries were skipped. Anything that is not an
// array counts as "no snippets".
fn decode(value: Value) -> (Vec<Snippet>, usize) {
    let records = match value {
        Value::Array(records) => records,
        Value::Null => return (Vec::new(), 0),
        _ => {
            warn!("stored snippets are not a list, starting empty");
            return (Vec::new(), 1);
        }
    };

    let mut snippets = Vec::with_capacity(records.len());
    let mut rejected = 0;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Snippet>(record) {
            Ok(snippet) => snippets.push(snippet),
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable snippet record");
                rejected += 1;
            }
        }
    }
    (snippets, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::storage::MemoryStorage;
    use crate::ValidationError;
    use serde_json::json;

    fn repo_with(snippets: &[Snippet]) -> (SnippetRepository, MemoryStorage) {
        let storage = MemoryStorage::with_value(serde_json::to_value(snippets).unwrap());
        let repo = SnippetRepository::open(storage.clone()).unwrap();
        (repo, storage)
    }

    #[test]
    fn opens_empty_without_stored_data() {
        let repo = SnippetRepository::open(MemoryStorage::new()).unwrap();
        assert!(repo.is_empty());
        assert!(!repo.is_dirty());
    }

    #[test]
    fn non_list_data_opens_empty() {
        let repo = SnippetRepository::open(MemoryStorage::with_value(json!({"a": 1}))).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn unreadable_records_are_skipped_and_backed_up() {
        let good = Snippet::text("greet", "Hello");
        let stored = json!([
            serde_json::to_value(&good).unwrap(),
            {"name": "bad", "content": null, "category": "text"},
            {"name": "odd", "content": "x", "category": "image"},
            {"content": "nameless", "category": "text"}
        ]);
        let storage = MemoryStorage::with_value(stored.clone());

        let repo = SnippetRepository::open(storage.clone()).unwrap();

        assert_eq!(repo.list(), &[good]);
        assert_eq!(storage.backups(), vec![stored]);
    }

    #[test]
    fn clean_stores_are_not_backed_up() {
        let storage = MemoryStorage::with_value(json!([{"name": "a", "content": "1", "type": "text"}]));

        let repo = SnippetRepository::open(storage.clone()).unwrap();

        assert_eq!(repo.len(), 1);
        assert!(storage.backups().is_empty());
    }

    #[test]
    fn add_appends_and_persists() {
        let (mut repo, storage) = repo_with(&[Snippet::text("a", "1")]);
        let added = Snippet::code("b", Language::Python, "print(1)");

        repo.add(added.clone()).unwrap();

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.list().last(), Some(&added));
        let stored: Vec<Snippet> = serde_json::from_value(storage.stored().unwrap()).unwrap();
        assert_eq!(stored, repo.list());
    }

    #[test]
    fn add_rejects_invalid_snippets_without_change() {
        let (mut repo, storage) = repo_with(&[]);

        let err = repo.add(Snippet::text("", "body")).unwrap_err();
        assert!(matches!(
            err,
            ObsnippetsError::Validation(ValidationError::EmptyName)
        ));
        let err = repo.add(Snippet::text("name", " ")).unwrap_err();
        assert!(matches!(
            err,
            ObsnippetsError::Validation(ValidationError::EmptyTextContent)
        ));

        assert!(repo.is_empty());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn update_keeps_position_and_id() {
        let first = Snippet::text("a", "1");
        let second = Snippet::text("b", "2");
        let third = Snippet::text("c", "3");
        let (mut repo, _) = repo_with(&[first.clone(), second.clone(), third.clone()]);

        repo.update(second.id, Snippet::text("b2", "two")).unwrap();

        assert_eq!(repo.len(), 3);
        assert_eq!(repo.list()[0], first);
        assert_eq!(repo.list()[1].id, second.id);
        assert_eq!(repo.list()[1].content, "two");
        assert_eq!(repo.list()[2], third);
    }

    #[test]
    fn update_and_remove_of_absent_ids_change_nothing() {
        let (mut repo, storage) = repo_with(&[Snippet::text("a", "1")]);
        let before = repo.list().to_vec();
        let stranger = SnippetId::new();

        assert!(matches!(
            repo.update(stranger, Snippet::text("x", "y")),
            Err(ObsnippetsError::NotFound(id)) if id == stranger
        ));
        assert!(matches!(
            repo.remove(stranger),
            Err(ObsnippetsError::NotFound(_))
        ));
        assert_eq!(repo.list(), before.as_slice());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn remove_drops_only_the_target() {
        let twin_a = Snippet::text("same", "same");
        let twin_b = Snippet::text("same", "same");
        let (mut repo, _) = repo_with(&[twin_a.clone(), twin_b.clone()]);

        let removed = repo.remove(twin_b.id).unwrap();

        assert_eq!(removed, twin_b);
        assert_eq!(repo.list(), &[twin_a]);
    }

    #[test]
    fn failed_save_keeps_change_and_retries_on_next_mutation() {
        let (mut repo, storage) = repo_with(&[]);
        storage.set_fail_saves(true);

        let err = repo.add(Snippet::text("a", "1")).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(repo.len(), 1);
        assert!(repo.is_dirty());

        storage.set_fail_saves(false);
        repo.add(Snippet::text("b", "2")).unwrap();

        assert!(!repo.is_dirty());
        let stored: Vec<Snippet> = serde_json::from_value(storage.stored().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn flush_writes_pending_changes() {
        let (mut repo, storage) = repo_with(&[]);
        storage.set_fail_saves(true);
        let _ = repo.add(Snippet::text("a", "1"));

        storage.set_fail_saves(false);
        repo.flush().unwrap();

        assert!(!repo.is_dirty());
        assert_eq!(storage.stored().unwrap().as_array().unwrap().len(), 1);
    }
}
