//! Reading lists and their ordering.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::InvalidInputError;
use crate::types::{BookId, EntryId, ReadingListId};

use super::Book;

/// A named, ordered list of books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingList {
    pub id: ReadingListId,
    pub name: String,
    #[serde(default)]
    pub books: Vec<ReadingListEntry>,
}

/// A book's membership in a reading list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingListEntry {
    pub id: EntryId,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub book_details: Option<Book>,
}

impl ReadingListEntry {
    pub fn book_id(&self) -> Option<BookId> {
        self.book_details.as_ref().map(|b| b.id)
    }

    pub fn title(&self) -> &str {
        self.book_details
            .as_ref()
            .map(|b| b.title.as_str())
            .unwrap_or("No Title Available")
    }
}

impl ReadingList {
    /// Returns true if `book` is on this list.
    pub fn contains_book(&self, book: BookId) -> bool {
        self.books.iter().any(|e| e.book_id() == Some(book))
    }

    /// Entries sorted by their `order` field.
    pub fn sort_entries(&mut self) {
        self.books.sort_by_key(|e| e.order);
    }

    /// Move the entry at position `from` to position `to` and renumber
    /// every entry's `order` from zero.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.books.len();
        for index in [from, to] {
            if index >= len {
                return Err(InvalidInputError::Position { index, len }.into());
            }
        }
        let entry = self.books.remove(from);
        self.books.insert(to, entry);
        for (position, entry) in self.books.iter_mut().enumerate() {
            entry.order = position as u32;
        }
        Ok(())
    }

    /// The payload for `PUT /reading-lists/{id}/reorder/` matching the
    /// current entry sequence.
    pub fn reorder_request(&self) -> ReorderRequest {
        ReorderRequest {
            books: self
                .books
                .iter()
                .enumerate()
                .map(|(position, entry)| EntryOrder {
                    id: entry.id,
                    order: position as u32,
                })
                .collect(),
        }
    }
}

/// Request body for `PUT /reading-lists/{id}/reorder/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub books: Vec<EntryOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOrder {
    pub id: EntryId,
    pub order: u32,
}
