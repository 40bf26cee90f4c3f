//! Bearer authorization with one-shot token refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, instrument, warn};

use bookshelf_core::error::AuthError;
use bookshelf_core::models::{RefreshRequest, RefreshResponse};
use bookshelf_core::{
    AccessToken, ApiRequest, ApiResponse, Error, LOGIN_PATH, Navigator, RefreshToken, Result,
    Session, Transport,
};

use crate::endpoints::TOKEN_REFRESH;

type RefreshOutcome = std::result::Result<AccessToken, Arc<Error>>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Wraps a [`Transport`] with bearer authorization and token refresh.
///
/// Every request is sent with `Authorization: Bearer <access_token>` when
/// the session holds an access token. A 401 on a request that has not been
/// replayed yet triggers a refresh against `/token/refresh/`, after which
/// the request is sent once more with the new token. If the refresh call
/// fails, both tokens are cleared, the navigator is sent to `/login`, and
/// the caller receives [`AuthError::RefreshFailed`].
///
/// Concurrent 401s share a single refresh call.
pub struct AuthLayer<T> {
    inner: Arc<LayerInner<T>>,
}

struct LayerInner<T> {
    transport: T,
    session: Session,
    navigator: Arc<dyn Navigator>,
    pending: Mutex<Option<(u64, SharedRefresh)>>,
    generation: AtomicU64,
}

impl<T> Clone for AuthLayer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport + 'static> AuthLayer<T> {
    pub fn new(transport: T, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            inner: Arc::new(LayerInner {
                transport,
                session,
                navigator,
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The wrapped transport, for calls that must not be intercepted.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Send a request, refreshing the access token and replaying once on 401.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let sent_with = self.authorize(&mut request)?;

        let err = match self.inner.transport.send(&request).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if !err.is_unauthorized() || request.retried {
            return Err(err);
        }
        request.retried = true;

        let Some(token) = self.fresh_token(sent_with.as_ref()).await? else {
            return Err(err);
        };

        request.set_header("authorization", token.bearer());
        debug!("Replaying request with refreshed token");
        self.inner.transport.send(&request).await
    }

    /// Attach the current access token, returning the token used.
    fn authorize(&self, request: &mut ApiRequest) -> Result<Option<AccessToken>> {
        let token = self.inner.session.access_token()?;
        match token {
            Some(ref token) => request.set_header("authorization", token.bearer()),
            None => debug!("No access token stored, sending without authorization"),
        }
        Ok(token)
    }

    /// A token to replay with after a 401 caused by `stale`.
    ///
    /// Returns `Ok(None)` when there is no refresh token to use.
    async fn fresh_token(&self, stale: Option<&AccessToken>) -> Result<Option<AccessToken>> {
        // Another request may have refreshed while this one was in flight.
        if let Some(current) = self.inner.session.access_token()? {
            if stale != Some(&current) {
                debug!("Access token already replaced, skipping refresh");
                return Ok(Some(current));
            }
        }

        let Some(refresh) = self.inner.session.refresh_token()? else {
            debug!("No refresh token stored");
            return Ok(None);
        };

        let (generation, pending) = self.pending_refresh(refresh);
        let outcome = pending.await;
        self.finish_refresh(generation);

        outcome
            .map(Some)
            .map_err(|e| AuthError::RefreshFailed(e).into())
    }

    /// Join the in-flight refresh, or start one.
    fn pending_refresh(&self, refresh: RefreshToken) -> (u64, SharedRefresh) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some((generation, ref shared)) = *pending {
            debug!(generation, "Joining in-flight token refresh");
            return (generation, shared.clone());
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let inner = Arc::clone(&self.inner);
        let shared = async move { inner.refresh(refresh).await.map_err(Arc::new) }
            .boxed()
            .shared();
        *pending = Some((generation, shared.clone()));
        (generation, shared)
    }

    fn finish_refresh(&self, generation: u64) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if matches!(*pending, Some((current, _)) if current == generation) {
            *pending = None;
        }
    }
}

impl<T: Transport> LayerInner<T> {
    /// Exchange the refresh token for a new access token.
    ///
    /// On failure the session is terminated and the UI is sent to the
    /// login view.
    async fn refresh(&self, refresh: RefreshToken) -> Result<AccessToken> {
        info!("Refreshing access token");

        match self.exchange(&refresh).await {
            Ok(token) => {
                debug!("Access token refreshed");
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, ending session");
                if let Err(clear_err) = self.session.expire() {
                    warn!(error = %clear_err, "Failed to clear session tokens");
                }
                self.navigator.redirect(LOGIN_PATH);
                Err(err)
            }
        }
    }

    async fn exchange(&self, refresh: &RefreshToken) -> Result<AccessToken> {
        let request = ApiRequest::post(TOKEN_REFRESH).with_json(&RefreshRequest {
            refresh: refresh.as_str(),
        })?;

        let response = self.transport.send(&request).await?;
        let body: RefreshResponse = response.json()?;
        let token = AccessToken::new(body.access);
        self.session.replace_access_token(&token)?;
        Ok(token)
    }
}

#[async_trait]
impl<T: Transport + 'static> Transport for AuthLayer<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.execute(request.clone()).await
    }
}
