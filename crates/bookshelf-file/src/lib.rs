//! bookshelf-file - Persistent token store.
//!
//! [`FileTokenStore`] keeps the session tokens in a JSON file so a login
//! outlives the process, the way browser local storage does for the web
//! client.

mod store;

pub use store::FileTokenStore;
