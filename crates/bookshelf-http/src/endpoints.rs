//! Endpoint paths of the bookshelf API, relative to the API base.

use bookshelf_core::{BookId, ReadingListId};

// ============================================================================
// Authentication
// ============================================================================

/// Account creation.
pub const REGISTER: &str = "/register/";

/// Credential exchange; answers `{"access", "refresh"}`.
pub const LOGIN: &str = "/login/";

/// Access token refresh; takes `{"refresh"}`, answers `{"access"}`.
pub const TOKEN_REFRESH: &str = "/token/refresh/";

// ============================================================================
// Books
// ============================================================================

/// The logged-in user's books.
pub const BOOKS: &str = "/books/";

/// The shared catalogue.
pub const ALL_BOOKS: &str = "/all-books/";

pub fn book(id: BookId) -> String {
    format!("/books/{}/", id)
}

pub fn book_detail(id: BookId) -> String {
    format!("/books/{}/detail/", id)
}

pub fn book_delete(id: BookId) -> String {
    format!("/books/{}/delete/", id)
}

// ============================================================================
// Profile
// ============================================================================

pub const PROFILE: &str = "/profile/";

// ============================================================================
// Reading lists
// ============================================================================

pub const READING_LISTS: &str = "/reading-lists/";

pub fn reading_list(id: ReadingListId) -> String {
    format!("/reading-lists/{}/", id)
}

pub fn reading_list_add(list: ReadingListId, book: BookId) -> String {
    format!("/reading-lists/{}/add/{}/", list, book)
}

pub fn reading_list_remove(list: ReadingListId, book: BookId) -> String {
    format!("/reading-lists/{}/remove/{}/", list, book)
}

pub fn reading_list_reorder(list: ReadingListId) -> String {
    format!("/reading-lists/{}/reorder/", list)
}
