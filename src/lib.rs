pub mod api;
pub mod cli;
pub mod config;
pub mod session;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use api::ApiClient;
use config::Config;
use session::SessionStore;

/// Everything a command needs: configuration, the session store, and the
/// shared API client. Built once in `main` and passed down explicitly;
/// there is no ambient global state, which keeps the pieces swappable in
/// tests.
pub struct AppContext {
    pub config: Config,
    pub api_url: String,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
}

impl AppContext {
    pub fn new(config: Config, api_url: &str) -> Result<Self> {
        let session = Arc::new(SessionStore::new(&config.storage.data_dir));
        let timeout = Duration::from_secs(config.server.timeout_secs);
        let api = ApiClient::new(api_url, timeout, session.clone())?
            .with_auth_expired_hook(|| {
                eprintln!("Your session has expired. Run 'taskly login <email>' to sign in again.");
            });
        Ok(Self {
            config,
            api_url: api_url.to_string(),
            session,
            api,
        })
    }
}
