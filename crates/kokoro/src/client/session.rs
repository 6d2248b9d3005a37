use crate::client::base::{BaseClient, Config, SecureClient, json_body};
use crate::error::Error;
use async_trait::async_trait;
use http::Method;
use kokoro_http::HttpClient;
use kokoro_model::login::{Credentials, TokenResponse};
use kokoro_model::user::User;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Access token and the account it belongs to.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user.username)
            .finish()
    }
}

impl From<TokenResponse> for Session {
    fn from(response: TokenResponse) -> Self {
        Self {
            token: response.access_token,
            user: response.user,
        }
    }
}

/// Client that owns the session used for authenticated calls.
///
/// The session is set by [`SessionClient::login`] and dropped by [`SessionClient::logout`]. Nothing
/// is written to disk.
pub struct SessionClient {
    config: Config,
    http_client: HttpClient,
    session: Arc<RwLock<Option<Session>>>,
}

impl SessionClient {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            http_client: config.http_client(),
            config,
            session: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub fn with_session(config: Config, session: Session) -> Self {
        Self {
            http_client: config.http_client(),
            config,
            session: Arc::new(RwLock::new(Some(session))),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let url = self.config.base_url.for_api(&["auth", "login"])?;
        let (headers, body) = json_body(&Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        })?;
        let response: TokenResponse = self.api_call(Method::POST, url, headers, body).await?;
        let session = Session::from(response);
        let user = session.user.clone();
        tracing::info!(user = %user.username, "Logged in");
        *self.session.write().await = Some(session);
        Ok(user)
    }

    pub async fn logout(&self) {
        if let Some(session) = self.session.write().await.take() {
            tracing::info!(user = %session.user.username, "Logged out");
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }
}

impl BaseClient for SessionClient {
    fn get_http_client(&self) -> &HttpClient {
        &self.http_client
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl SecureClient for SessionClient {
    fn get_session(&self) -> Arc<RwLock<Option<Session>>> {
        Arc::clone(&self.session)
    }
}
