pub mod api_client;
pub mod booking;
pub mod config;
pub mod models;
pub mod seating;
pub mod session;

use std::sync::Arc;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub api: api_client::ApiClient,
    pub session: session::SessionStore,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let api = api_client::ApiClient::from_config(&config.api);
        let session = session::SessionStore::new(&config.session.path);
        Arc::new(Self {
            api,
            session,
            config,
        })
    }
}
