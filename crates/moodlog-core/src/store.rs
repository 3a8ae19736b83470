//! Entry storage
//!
//! The history is read and written as a whole JSON array. `EntryStore` is
//! the seam; `JsonFileStore` persists to disk and `MemoryStore` keeps the
//! same JSON in memory. `Journal` layers the entry operations on top.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::export::{merge_by_date, validate_imported, ImportStats};
use crate::integrity::ensure_valid;
use crate::models::{EntryDraft, EntryEdit, MoodEntry};

/// Whole-list persistence for the entry history
pub trait EntryStore: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Raw persisted text, `None` when nothing has been written yet
    fn raw(&self) -> Result<Option<String>>;

    /// Replace the persisted text
    fn write_raw(&self, content: &str) -> Result<()>;

    /// Load the full history (empty when nothing is persisted)
    fn load(&self) -> Result<Vec<MoodEntry>> {
        match self.raw()? {
            Some(raw) => parse_entries(&raw),
            None => Ok(vec![]),
        }
    }

    /// Replace the full history
    fn save(&self, entries: &[MoodEntry]) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        self.write_raw(&content)?;
        debug!(store = self.name(), count = entries.len(), "Saved entries");
        Ok(())
    }
}

/// Parse persisted store text
pub fn parse_entries(raw: &str) -> Result<Vec<MoodEntry>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|_| Error::Parse("Data is corrupted and cannot be parsed".to_string()))?;

    if !value.is_array() {
        return Err(Error::Parse(
            "Data is not in correct array format".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
}

/// Store backed by a JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryStore for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    /// Writes to a temp file in the same directory, then renames over the target
    fn write_raw(&self, content: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

/// Store kept in memory
#[derive(Default)]
pub struct MemoryStore {
    content: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from arbitrary raw text, valid or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(raw.into())),
        }
    }

    pub fn with_entries(entries: &[MoodEntry]) -> Result<Self> {
        let store = Self::new();
        store.save(entries)?;
        Ok(store)
    }
}

impl EntryStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn raw(&self) -> Result<Option<String>> {
        let guard = self
            .content
            .lock()
            .map_err(|_| Error::Parse("memory store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn write_raw(&self, content: &str) -> Result<()> {
        let mut guard = self
            .content
            .lock()
            .map_err(|_| Error::Parse("memory store lock poisoned".to_string()))?;
        *guard = Some(content.to_string());
        Ok(())
    }
}

/// Entry operations over a store
pub struct Journal<S: EntryStore> {
    store: S,
}

impl<S: EntryStore> Journal<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn entries(&self) -> Result<Vec<MoodEntry>> {
        self.store.load()
    }

    pub fn get(&self, id: &str) -> Result<MoodEntry> {
        self.entries()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))
    }

    /// Validate and append a new entry
    ///
    /// The id is derived from the creation time and made unique against the
    /// current history. Nothing is written if validation fails.
    pub fn add(&self, draft: EntryDraft, now: DateTime<Utc>) -> Result<MoodEntry> {
        let mut entries = self.entries()?;

        let base = now.timestamp_millis().to_string();
        let mut id = base.clone();
        let mut suffix = 1;
        while entries.iter().any(|e| e.id == id) {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        let entry = draft.into_entry(id, now);
        ensure_valid(&entry)?;

        entries.push(entry.clone());
        self.store.save(&entries)?;
        info!(id = %entry.id, date = %entry.date, "Added entry");
        Ok(entry)
    }

    /// Change reflection, intensity, or energy on an entry
    pub fn edit(&self, id: &str, edit: &EntryEdit) -> Result<MoodEntry> {
        let mut entries = self.entries()?;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))?;

        let updated = edit.apply(slot);
        ensure_valid(&updated)?;
        *slot = updated.clone();

        self.store.save(&entries)?;
        info!(id, "Updated entry");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<MoodEntry> {
        let mut entries = self.entries()?;
        let pos = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))?;

        let removed = entries.remove(pos);
        self.store.save(&entries)?;
        info!(id, "Deleted entry");
        Ok(removed)
    }

    /// Remove every entry, returning how many there were
    pub fn clear(&self) -> Result<usize> {
        let count = self.entries()?.len();
        self.store.save(&[])?;
        info!(count, "Cleared all entries");
        Ok(count)
    }

    /// Merge imported entries, keeping the first entry per date
    ///
    /// Nothing is written if any imported entry is invalid.
    pub fn import(&self, imported: Vec<MoodEntry>) -> Result<ImportStats> {
        validate_imported(&imported)?;
        let existing = self.entries()?;
        let (merged, stats) = merge_by_date(existing, imported);
        self.store.save(&merged)?;
        info!(
            imported = stats.imported,
            added = stats.added,
            skipped = stats.skipped,
            "Imported entries"
        );
        Ok(stats)
    }

    /// Replace the whole history (restore and repair)
    pub fn replace_all(&self, entries: &[MoodEntry]) -> Result<()> {
        self.store.save(entries)?;
        info!(count = entries.len(), "Replaced all entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MoodKind;
    use crate::test_utils::{day, sample_journal, EntryBuilder};
    use tempfile::TempDir;

    fn draft(date: &str) -> EntryDraft {
        let mut draft = EntryDraft::new(day(date));
        draft.moods = vec![MoodKind::Happy];
        draft
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("entries.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.raw().unwrap().is_none());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("entries.json"));
        store.save(&sample_journal()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, sample_journal());
    }

    #[test]
    fn test_corrupted_store_is_parse_error() {
        let store = MemoryStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(Error::Parse(_))));

        let store = MemoryStore::with_raw(r#"{"entries": []}"#);
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("not in correct array format"));
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let journal = Journal::new(MemoryStore::new());
        let now = Utc::now();

        let a = journal.add(draft("2024-01-01"), now).unwrap();
        let b = journal.add(draft("2024-01-02"), now).unwrap();
        let c = journal.add(draft("2024-01-03"), now).unwrap();

        assert_eq!(a.id, now.timestamp_millis().to_string());
        assert_eq!(b.id, format!("{}-1", a.id));
        assert_eq!(c.id, format!("{}-2", a.id));
        assert_eq!(journal.entries().unwrap().len(), 3);
    }

    #[test]
    fn test_add_rejects_invalid_without_writing() {
        let journal = Journal::new(MemoryStore::new());

        let err = journal
            .add(EntryDraft::new(day("2024-01-01")), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let mut bad = draft("2024-01-01");
        bad.intensity = 11;
        assert!(journal.add(bad, Utc::now()).is_err());

        assert!(journal.store().raw().unwrap().is_none());
    }

    #[test]
    fn test_edit_and_delete() {
        let store = MemoryStore::with_entries(&sample_journal()).unwrap();
        let journal = Journal::new(store);

        let edit = EntryEdit {
            reflection: Some("Edited".to_string()),
            intensity: Some(2),
            energy: None,
        };
        let updated = journal.edit("3", &edit).unwrap();
        assert_eq!(updated.reflection, "Edited");
        assert_eq!(journal.get("3").unwrap().intensity, 2);

        let bad = EntryEdit {
            energy: Some(9),
            ..Default::default()
        };
        assert!(matches!(journal.edit("3", &bad), Err(Error::Validation(_))));
        assert_eq!(journal.get("3").unwrap().energy, 2);

        journal.delete("3").unwrap();
        assert!(matches!(journal.get("3"), Err(Error::NotFound(_))));
        assert!(matches!(journal.delete("3"), Err(Error::NotFound(_))));
        assert_eq!(journal.entries().unwrap().len(), 5);
    }

    #[test]
    fn test_clear() {
        let journal = Journal::new(MemoryStore::with_entries(&sample_journal()).unwrap());
        assert_eq!(journal.clear().unwrap(), 6);
        assert!(journal.entries().unwrap().is_empty());
    }

    #[test]
    fn test_import_merges_by_date() {
        let journal = Journal::new(MemoryStore::with_entries(&sample_journal()).unwrap());
        let imported = vec![
            EntryBuilder::new("2024-01-15").id("dup").build(),
            EntryBuilder::new("2024-01-16").id("new").build(),
        ];

        let stats = journal.import(imported).unwrap();
        assert_eq!(stats.added, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(journal.get("1").unwrap().date, day("2024-01-15"));
        assert!(journal.get("dup").is_err());
        assert!(journal.get("new").is_ok());
    }

    #[test]
    fn test_import_rejects_invalid_without_writing() {
        let journal = Journal::new(MemoryStore::with_entries(&sample_journal()).unwrap());
        let before = journal.store().raw().unwrap();

        let mut broken = EntryBuilder::new("2024-01-20").id("broken").build();
        broken.moods.clear();
        broken.intensity = 0;
        let imported = vec![EntryBuilder::new("2024-01-16").id("fine").build(), broken];

        assert!(matches!(journal.import(imported), Err(Error::Import(_))));
        assert_eq!(journal.store().raw().unwrap(), before);
        assert!(journal.get("fine").is_err());
    }
}
