//! bookshelf-core - Core types and traits for the bookshelf client.
//!
//! The client talks to a book cataloguing and reading-list API with bearer
//! tokens. This crate holds everything that does not touch the network:
//! the error type, configuration, the [`Session`] context over a
//! [`TokenStore`], the [`Transport`] and [`Navigator`] seams, and the wire
//! models.

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::{ClientConfig, Environment};
pub use credentials::Credentials;
pub use error::Error;
pub use request::{ApiRequest, ApiResponse, FileUpload, Method, MultipartForm, RequestBody};
pub use session::Session;
pub use store::MemoryTokenStore;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{LOGIN_PATH, Navigator, RecordingNavigator, StoreKey, TokenStore, Transport};
pub use types::{ApiUrl, BookId, EntryId, MediaBaseUrl, ReadingListId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
