use crate::client::base::{BaseClient, Config};
use kokoro_http::HttpClient;

/// Client for the endpoints that need no session.
pub struct SimpleClient {
    config: Config,
    http_client: HttpClient,
}

impl SimpleClient {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            http_client: config.http_client(),
            config,
        }
    }
}

impl BaseClient for SimpleClient {
    fn get_http_client(&self) -> &HttpClient {
        &self.http_client
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}
