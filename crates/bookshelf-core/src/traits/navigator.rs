//! Navigation trait used to force re-authentication.

use std::sync::Mutex;

/// Path of the login view.
pub const LOGIN_PATH: &str = "/login";

/// The UI layer's navigation hook.
///
/// The client calls [`Navigator::redirect`] with [`LOGIN_PATH`] when a
/// session can no longer be refreshed. This is a full redirect: the UI is
/// expected to drop whatever view state it had.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`.
    fn redirect(&self, path: &str);
}

/// A navigator that only remembers where it was sent.
///
/// Useful for headless embedders that poll for a forced logout, and in tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every path redirected to, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        match self.redirects.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        match self.redirects.lock() {
            Ok(mut guard) => guard.push(path.to_string()),
            Err(poisoned) => poisoned.into_inner().push(path.to_string()),
        }
    }
}
