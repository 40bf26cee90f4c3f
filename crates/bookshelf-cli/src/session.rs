//! Session storage and client construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use bookshelf_core::error::AuthError;
use bookshelf_core::{ApiUrl, ClientConfig, LOGIN_PATH, MediaBaseUrl, Navigator};
use bookshelf_file::FileTokenStore;
use bookshelf_http::BookshelfClient;

use crate::cli::ConnectionArgs;
use crate::output;

/// Tells the user to log in again once the session cannot be refreshed.
#[derive(Debug, Default)]
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect(&self, path: &str) {
        if path == LOGIN_PATH {
            output::error("Your session has expired. Run 'bookshelf login' to sign in again.");
        } else {
            tracing::debug!(path, "Ignoring navigation");
        }
    }
}

/// Get the session file path.
fn session_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let dirs =
        ProjectDirs::from("", "", "bookshelf").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("session.json"))
}

/// Resolve the client configuration from flags, falling back to the
/// `BOOKSHELF_ENV` defaults.
fn client_config(args: &ConnectionArgs) -> Result<ClientConfig> {
    let mut config = match &args.api_url {
        Some(url) => ClientConfig::with_base_url(ApiUrl::new(url).context("Invalid API URL")?)?,
        None => ClientConfig::from_env()?,
    };

    if let Some(url) = &args.media_url {
        config.media_base_url = MediaBaseUrl::new(url).context("Invalid media URL")?;
    }

    Ok(config)
}

/// Build a client over the on-disk session.
pub fn connect(args: &ConnectionArgs) -> Result<BookshelfClient> {
    let config = client_config(args)?;
    let path = session_path(args.session_file.as_deref())?;
    tracing::debug!(api = %config.base_url, session = %path.display(), "Connecting");

    let client = BookshelfClient::new(
        config,
        Arc::new(FileTokenStore::new(path)),
        Arc::new(CliNavigator),
    )?;
    Ok(client)
}

/// Build a client and fail early when nobody is logged in.
pub fn connect_authenticated(args: &ConnectionArgs) -> Result<BookshelfClient> {
    let client = connect(args)?;
    if !client
        .session()
        .is_authenticated()
        .context("Failed to read session")?
    {
        return Err(AuthError::NotAuthenticated)
            .context("No active session. Run 'bookshelf login' first.");
    }
    Ok(client)
}
