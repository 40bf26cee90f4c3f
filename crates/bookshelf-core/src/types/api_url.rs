//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated API base URL, e.g. `https://api.bookshelf.app/api`.
///
/// Network URLs must use HTTPS, except for loopback hosts where plain HTTP
/// is accepted for local development.
///
/// # Example
///
/// ```
/// use bookshelf_core::ApiUrl;
///
/// let api = ApiUrl::new("http://127.0.0.1:8000/api/").unwrap();
/// assert_eq!(api.endpoint("/books/"), "http://127.0.0.1:8000/api/books/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = parse_http_base(s)?;
        Ok(Self(url))
    }

    /// Returns the absolute URL of an endpoint path such as `/books/`.
    ///
    /// Exactly one slash separates the base from the path; a trailing slash
    /// on the path is preserved.
    pub fn endpoint(&self, path: &str) -> String {
        join_url(self.0.as_str(), path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the scheme, host and port, e.g. `http://127.0.0.1:8000`.
    pub fn origin(&self) -> String {
        self.0.origin().ascii_serialization()
    }

    /// Returns true if the host is a loopback address.
    pub fn is_local(&self) -> bool {
        is_loopback(&self.0)
    }
}

/// Joins a base URL and a path with exactly one separating slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_loopback(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]")
}

/// Parses and validates an `http(s)` base URL, dropping a trailing slash.
pub(crate) fn parse_http_base(s: &str) -> Result<Url, Error> {
    let url = Url::parse(s).map_err(|e| InvalidInputError::Url {
        value: s.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(InvalidInputError::Url {
            value: s.to_string(),
            reason: "must be an absolute URL".to_string(),
        }
        .into());
    }

    if url.host_str().is_none() {
        return Err(InvalidInputError::Url {
            value: s.to_string(),
            reason: "must have a host".to_string(),
        }
        .into());
    }

    let scheme = url.scheme();
    if scheme != "https" && !(scheme == "http" && is_loopback(&url)) {
        return Err(InvalidInputError::Url {
            value: s.to_string(),
            reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
        }
        .into());
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(InvalidInputError::Url {
            value: s.to_string(),
            reason: "must not carry a query or fragment".to_string(),
        }
        .into());
    }

    // Normalize: remove trailing slash
    let mut normalized = url;
    let trimmed = normalized.path().trim_end_matches('/').to_string();
    normalized.set_path(&trimmed);

    Ok(normalized)
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
