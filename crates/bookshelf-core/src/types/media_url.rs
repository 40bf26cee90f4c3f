//! Media base URL type.

use std::fmt;
use std::str::FromStr;

use url::Url;

use super::api_url::{join_url, parse_http_base};
use crate::error::Error;

/// Base URL used to turn relative media paths returned by the API
/// (book covers, avatars) into absolute URLs.
///
/// # Example
///
/// ```
/// use bookshelf_core::MediaBaseUrl;
///
/// let media = MediaBaseUrl::new("https://host").unwrap();
/// assert_eq!(media.resolve("/media/cover.png"), "https://host/media/cover.png");
/// assert_eq!(media.resolve("https://cdn/x.png"), "https://cdn/x.png");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaBaseUrl(Url);

impl MediaBaseUrl {
    /// Create a new media base URL, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self(parse_http_base(s.as_ref())?))
    }

    /// Resolve a media path into an absolute URL.
    ///
    /// A path that already is an absolute URL is returned unchanged.
    /// Otherwise the base is prepended with exactly one separating slash.
    pub fn resolve(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        join_url(self.0.as_str(), path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MediaBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MediaBaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
