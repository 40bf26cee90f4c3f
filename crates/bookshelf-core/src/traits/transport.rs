//! Request transport trait.

use async_trait::async_trait;

use crate::Result;
use crate::request::{ApiRequest, ApiResponse};

/// Something that can carry an [`ApiRequest`] to the remote API.
///
/// Implementations resolve `request.path` against their base URL and
/// honour the headers and body as given. A 2xx answer is `Ok`; any other
/// status is `Err(Error::Protocol)` carrying the status and body; no answer
/// at all is `Err(Error::Transport)`.
///
/// Decorators such as the refresh layer implement this trait too, so they
/// compose by wrapping.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for its response.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}
