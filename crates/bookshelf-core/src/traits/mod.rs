//! Seams between the client core and its collaborators.

mod navigator;
mod token_store;
mod transport;

pub use navigator::{LOGIN_PATH, Navigator, RecordingNavigator};
pub use token_store::{StoreKey, TokenStore};
pub use transport::Transport;
