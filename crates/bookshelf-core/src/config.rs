//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::types::{ApiUrl, MediaBaseUrl};

/// Environment variable selecting the deployment environment.
pub const ENV_VAR: &str = "BOOKSHELF_ENV";

/// Fixed deadline applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEVELOPMENT_API_URL: &str = "http://127.0.0.1:8000/api";
const DEVELOPMENT_MEDIA_URL: &str = "http://127.0.0.1:8000";
const PRODUCTION_API_URL: &str = "https://api.bookshelf.app/api";
const PRODUCTION_MEDIA_URL: &str = "https://api.bookshelf.app";

/// Deployment environment, fixed for the life of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// The environment of this process.
    ///
    /// Read from `BOOKSHELF_ENV` on first call and cached; later changes to
    /// the variable have no effect. Unset or unrecognised values mean
    /// development.
    pub fn current() -> Self {
        static CURRENT: OnceLock<Environment> = OnceLock::new();
        *CURRENT.get_or_init(|| {
            std::env::var(ENV_VAR)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default()
        })
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(InvalidInputError::Other {
                message: format!("unknown environment '{}'", other),
            }
            .into()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Settings for an API client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base of every API path, e.g. `http://127.0.0.1:8000/api`.
    pub base_url: ApiUrl,
    /// Base used to resolve relative media paths.
    pub media_base_url: MediaBaseUrl,
    /// Deadline for each individual request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Defaults for the given environment.
    pub fn for_environment(env: Environment) -> Result<Self> {
        let (api, media) = match env {
            Environment::Development => (DEVELOPMENT_API_URL, DEVELOPMENT_MEDIA_URL),
            Environment::Production => (PRODUCTION_API_URL, PRODUCTION_MEDIA_URL),
        };
        Ok(Self {
            base_url: ApiUrl::new(api)?,
            media_base_url: MediaBaseUrl::new(media)?,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Defaults for [`Environment::current`].
    pub fn from_env() -> Result<Self> {
        Self::for_environment(Environment::current())
    }

    /// A configuration pointing at an explicit API, e.g. a test server.
    ///
    /// The media base defaults to the API URL's origin.
    pub fn with_base_url(base_url: ApiUrl) -> Result<Self> {
        Ok(Self {
            media_base_url: MediaBaseUrl::new(base_url.origin())?,
            base_url,
            timeout: REQUEST_TIMEOUT,
        })
    }
}
