//! Token store trait.

use std::fmt;

use crate::Result;

/// The keys a token store holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// The bearer access token.
    AccessToken,
    /// The refresh token.
    RefreshToken,
    /// The username of the logged-in account, cached for display.
    Username,
}

impl StoreKey {
    /// Every key, in storage order.
    pub const ALL: [StoreKey; 3] = [
        StoreKey::AccessToken,
        StoreKey::RefreshToken,
        StoreKey::Username,
    ];

    /// The persisted name of this key.
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::AccessToken => "access_token",
            StoreKey::RefreshToken => "refresh_token",
            StoreKey::Username => "username",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value storage for session credentials.
///
/// There is no expiry tracking; token lifetime is left entirely to the
/// server. Absence of a key is a normal state, not an error.
pub trait TokenStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: StoreKey) -> Result<Option<String>>;

    /// Overwrites the value for `key`.
    fn set(&self, key: StoreKey, value: &str) -> Result<()>;

    /// Removes the named keys. Absent keys are ignored.
    fn clear(&self, keys: &[StoreKey]) -> Result<()>;
}
