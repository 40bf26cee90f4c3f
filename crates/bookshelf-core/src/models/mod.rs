//! Wire models for the bookshelf API.

mod auth;
mod book;
mod profile;
mod reading_list;

pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, Registration};
pub use book::{Book, BookForm};
pub use profile::{Profile, ProfileUpdate};
pub use reading_list::{EntryOrder, ReadingList, ReadingListEntry, ReorderRequest};
