use crate::error::Result;
use crate::models::{BookRecord, BookmarkOutcome};
use crate::storage::{KeyValueStore, READING_LIST_KEY, load_json, save_json};
use tracing::{debug, info};

/// The player's "want to read" list, unique by title and written through to
/// the store on every change.
pub struct ReadingList<S: KeyValueStore> {
    store: S,
    entries: Vec<BookRecord>,
}

impl<S: KeyValueStore> ReadingList<S> {
    pub fn load(store: S) -> Result<Self> {
        let entries: Vec<BookRecord> = load_json(&store, READING_LIST_KEY)?.unwrap_or_default();
        debug!(count = entries.len(), "loaded reading list");
        Ok(Self { store, entries })
    }

    pub fn entries(&self) -> &[BookRecord] {
        &self.entries
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|book| book.title == title)
    }

    pub fn add(&mut self, book: BookRecord) -> Result<BookmarkOutcome> {
        if self.contains(&book.title) {
            debug!(title = %book.title, "book already on reading list");
            return Ok(BookmarkOutcome::AlreadyPresent);
        }

        info!(title = %book.title, "adding book to reading list");
        let mut updated = self.entries.clone();
        updated.push(book);
        self.commit(updated)?;
        Ok(BookmarkOutcome::Added)
    }

    /// Removes every entry titled `title` and returns how many went.
    pub fn remove(&mut self, title: &str) -> Result<usize> {
        let updated: Vec<BookRecord> = self
            .entries
            .iter()
            .filter(|book| book.title != title)
            .cloned()
            .collect();
        let removed = self.entries.len() - updated.len();
        if removed > 0 {
            info!(title, removed, "removing book from reading list");
            self.commit(updated)?;
        }
        Ok(removed)
    }

    /// Saves `updated` and only then makes it the in-memory list.
    fn commit(&mut self, updated: Vec<BookRecord>) -> Result<()> {
        save_json(&self.store, READING_LIST_KEY, &updated)?;
        self.entries = updated;
        Ok(())
    }
}
