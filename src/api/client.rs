//! Shared HTTP client for the Taskly service.
//!
//! One `ApiClient` is built per process and reused by every command. It owns
//! the two cross-cutting hooks:
//!
//! - outbound: attach the session's bearer token to every request that has one;
//! - inbound: on a 401, clear the session and fire the auth-expired callback,
//!   then hand the error back to the caller as usual.
//!
//! The inbound hook is cleanup, not error handling: callers still match on
//! the returned `ApiError`. Calls are fire-once: no retry, no backoff, no
//! deduplication.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::session::SessionStore;

type AuthExpiredHook = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
    on_auth_expired: Option<AuthExpiredHook>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            on_auth_expired: None,
        })
    }

    /// Install the callback fired when a response reports an expired or
    /// invalid session. The HTTP layer itself never navigates or prints;
    /// the hosting shell decides what "go back to login" means.
    pub fn with_auth_expired_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_auth_expired = Some(Arc::new(hook));
        self
    }

    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.execute(self.http.get(self.url(path))).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn patch(&self, path: &str) -> Result<Response, ApiError> {
        self.execute(self.http.patch(self.url(path))).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.execute(self.http.delete(self.url(path))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        debug!(status = %response.status(), "API response");

        if response.status() == StatusCode::UNAUTHORIZED {
            self.handle_auth_failure();
        }

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    /// Inbound 401 hook: clear the session, notify the shell once.
    fn handle_auth_failure(&self) {
        if let Err(err) = self.session.logout() {
            warn!(error = %err, "Failed to clear session after auth failure");
        }
        if let Some(hook) = &self.on_auth_expired {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn logged_in_store(dir: &std::path::Path) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new(dir));
        store
            .login(
                "tok-123",
                &SessionUser {
                    id: "u-1".to_string(),
                    email: "a@b.com".to_string(),
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_auth_failure_clears_session_and_fires_hook_once() {
        let dir = tempfile::tempdir().unwrap();
        let session = logged_in_store(dir.path());
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_hook = fired.clone();

        let client = ApiClient::new("http://localhost:8000", Duration::from_secs(1), session.clone())
            .unwrap()
            .with_auth_expired_hook(move || {
                fired_in_hook.fetch_add(1, Ordering::SeqCst);
            });

        client.handle_auth_failure();

        assert!(!session.is_authenticated());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_auth_failure_without_hook_still_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = logged_in_store(dir.path());
        let client =
            ApiClient::new("http://localhost:8000", Duration::from_secs(1), session.clone())
                .unwrap();

        client.handle_auth_failure();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_unreachable_server_maps_to_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::new(dir.path()));
        // Port 9 (discard) refuses connections; nothing listens there in CI
        let client =
            ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1), session).unwrap();
        let result = tokio_test::block_on(client.get("/tasks"));
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::new(dir.path()));
        let client =
            ApiClient::new("http://localhost:8000/", Duration::from_secs(1), session).unwrap();
        assert_eq!(client.url("/tasks"), "http://localhost:8000/tasks");
    }
}
