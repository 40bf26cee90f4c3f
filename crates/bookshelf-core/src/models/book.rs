//! Book records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{FileUpload, MultipartForm};
use crate::types::{BookId, MediaBaseUrl};

/// A book as returned by `/books/`, `/all-books/` and `/books/{id}/detail/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    /// Media path of the cover, relative to the media base.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Username of the owner.
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Case-insensitive match of `term` against title, authors or genre.
    ///
    /// An empty term matches every book.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.title, &self.authors, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Absolute URL of the cover image, if the book has one.
    pub fn cover_url(&self, media: &MediaBaseUrl) -> Option<String> {
        self.cover_image
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| media.resolve(p))
    }
}

/// Fields sent when creating or editing a book.
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: String,
    pub authors: String,
    pub genre: String,
    pub publication_date: Option<NaiveDate>,
    pub description: String,
    /// New cover; `None` leaves an existing cover untouched.
    pub cover_image: Option<FileUpload>,
}

impl BookForm {
    /// A form pre-filled from an existing book, with no new cover.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            authors: book.authors.clone(),
            genre: book.genre.clone(),
            publication_date: book.publication_date,
            description: book.description.clone().unwrap_or_default(),
            cover_image: None,
        }
    }

    /// Encode as `multipart/form-data`.
    pub fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("title", &self.title)
            .text("authors", &self.authors)
            .text("genre", &self.genre);
        if let Some(date) = self.publication_date {
            form = form.text("publication_date", date.format("%Y-%m-%d").to_string());
        }
        form = form.text("description", &self.description);
        if let Some(ref cover) = self.cover_image {
            form = form.file("cover_image", cover.clone());
        }
        form
    }
}
