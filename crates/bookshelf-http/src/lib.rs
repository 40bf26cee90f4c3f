//! bookshelf-http - HTTP client for the bookshelf API.
//!
//! [`HttpTransport`] sends requests with reqwest. [`AuthLayer`] wraps any
//! transport with bearer authorization and a single refresh-and-replay on
//! 401. [`BookshelfClient`] puts the two together behind typed endpoint
//! methods.

mod client;
pub mod endpoints;
mod refresh;
mod transport;

pub use client::BookshelfClient;
pub use refresh::AuthLayer;
pub use transport::HttpTransport;
