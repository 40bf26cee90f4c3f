//! Session context over a token store.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::Result;
use crate::tokens::{AccessToken, RefreshToken, TokenPair};
use crate::traits::{StoreKey, TokenStore};

/// The explicit session context shared by the HTTP client and the UI layer.
///
/// A `Session` owns no state of its own; every read goes to the underlying
/// [`TokenStore`], so a token written by one holder is seen by all others.
/// Cloning is cheap.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bookshelf_core::{AccessToken, MemoryTokenStore, RefreshToken, Session, TokenPair};
///
/// let session = Session::new(Arc::new(MemoryTokenStore::new()));
/// assert!(!session.is_authenticated().unwrap());
///
/// let tokens = TokenPair {
///     access: AccessToken::new("T1"),
///     refresh: RefreshToken::new("R1"),
/// };
/// session.begin(&tokens, Some("alice")).unwrap();
/// assert_eq!(session.username().unwrap().as_deref(), Some("alice"));
///
/// session.end().unwrap();
/// assert!(session.access_token().unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self.store.get(StoreKey::AccessToken)?.map(AccessToken::new))
    }

    pub fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self.store.get(StoreKey::RefreshToken)?.map(RefreshToken::new))
    }

    pub fn username(&self) -> Result<Option<String>> {
        self.store.get(StoreKey::Username)
    }

    /// Returns true if an access token is stored.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.get(StoreKey::AccessToken)?.is_some())
    }

    /// Store the tokens of a fresh login.
    pub fn begin(&self, tokens: &TokenPair, username: Option<&str>) -> Result<()> {
        self.store
            .set(StoreKey::AccessToken, tokens.access.as_str())?;
        self.store
            .set(StoreKey::RefreshToken, tokens.refresh.as_str())?;
        match username {
            Some(name) => self.store.set(StoreKey::Username, name)?,
            None => self.store.clear(&[StoreKey::Username])?,
        }
        info!(username = ?username, "Session started");
        Ok(())
    }

    /// Replace the access token after a successful refresh.
    pub fn replace_access_token(&self, token: &AccessToken) -> Result<()> {
        self.store.set(StoreKey::AccessToken, token.as_str())?;
        debug!("Access token replaced");
        Ok(())
    }

    /// Drop both tokens after an unrecoverable refresh failure.
    pub fn expire(&self) -> Result<()> {
        self.store
            .clear(&[StoreKey::AccessToken, StoreKey::RefreshToken])?;
        info!("Session expired");
        Ok(())
    }

    /// Log out: drop both tokens and the cached username.
    pub fn end(&self) -> Result<()> {
        self.store.clear(&StoreKey::ALL)?;
        info!("Session ended");
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
