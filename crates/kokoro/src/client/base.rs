use crate::client::session::Session;
use crate::error::{Error, HttpError, InternalError};
use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, Uri};
use kokoro_http::{BaseHttpClient, HttpClient, HttpRequest, HttpResponse};
use kokoro_model::history::{AssessmentHistory, AssessmentRecord};
use kokoro_model::questionnaire::{Questionnaire, QuestionnaireSummary};
use kokoro_model::resource::ResourceList;
use kokoro_model::risk::{RiskLevel, RiskResult};
use kokoro_model::status::ServiceStatus;
use kokoro_model::submission::{AssessmentSubmission, StartAssessment, SubmissionReceipt};
use kokoro_model::user::{NewUser, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: ApiUrl,
    pub timeout: Option<Duration>,
}

impl Config {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: ApiUrl::new(base_url),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn http_client(&self) -> HttpClient {
        HttpClient::default().with_timeout(self.timeout)
    }
}

#[derive(Debug, Clone)]
pub struct ApiUrl {
    pub url: Url,
}

impl From<ApiUrl> for Url {
    fn from(api_url: ApiUrl) -> Self {
        api_url.url
    }
}

impl ApiUrl {
    /// Without a trailing slash `join` would replace the last path segment of the base.
    #[must_use]
    pub fn new(mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self { url }
    }

    /// Api url built from path segments. Segments are percent encoded, so ids can be passed as is.
    pub fn for_api(&self, segments: &[&str]) -> Result<Url, InternalError> {
        let mut url = self.url.join("api/v1/")?;
        url.path_segments_mut()
            .map_err(|()| InternalError::CannotBeABase(self.url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn health(&self) -> Result<Url, InternalError> {
        self.url.join("health").map_err(Into::into)
    }
}

fn build_request(method: Method, url: &Url, headers: HeaderMap, body: Vec<u8>) -> Result<HttpRequest, Error> {
    let uri: Uri = url.as_str().parse().map_err(InternalError::from)?;
    let mut request_builder = http::request::Request::builder().method(method).uri(uri);
    if let Some(header_map) = request_builder.headers_mut() {
        header_map.extend(headers);
    }
    Ok(request_builder.body(body).map_err(HttpError::from)?)
}

pub(crate) fn json_body<B: Serialize>(body: &B) -> Result<(HeaderMap, Vec<u8>), Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok((headers, serde_json::to_vec(body)?))
}

#[async_trait]
pub trait BaseClient {
    fn get_http_client(&self) -> &HttpClient;
    fn get_config(&self) -> &Config;

    async fn api_send_request(&self, request: HttpRequest) -> Result<HttpResponse<String>, HttpError> {
        tracing::debug!(method = ?request.method(), uri = ?request.uri(), "Sending API request");
        self.get_http_client()
            .request_text(request)
            .await
            .map_err(HttpError::from)
    }

    async fn api_call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<T, Error> {
        let request = build_request(method, &url, headers, body)?;
        let res = self.api_send_request(request).await?;
        serde_json::from_str(res.body()).map_err(|err| {
            tracing::debug!(%url, %err, "Response did not match the expected shape");
            Error::from(err)
        })
    }

    async fn api_request<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T, Error> {
        self.api_call(method, url, HeaderMap::new(), vec![]).await
    }
}

#[async_trait]
pub trait PublicClient: BaseClient {
    async fn get_status(&self) -> Result<ServiceStatus, Error> {
        let url = self.get_config().base_url.health()?;
        self.api_request(Method::GET, url).await
    }

    async fn list_questionnaires(&self) -> Result<Vec<QuestionnaireSummary>, Error> {
        let url = self.get_config().base_url.for_api(&["assessment", "questionnaires"])?;
        self.api_request(Method::GET, url).await
    }

    /// Fetches a questionnaire and checks it before handing it out, so callers never see a question
    /// whose labels and scale values disagree.
    async fn get_questionnaire(&self, questionnaire_id: &str) -> Result<Questionnaire, Error> {
        let url = self
            .get_config()
            .base_url
            .for_api(&["assessment", "questionnaires", questionnaire_id])?;
        let questionnaire: Questionnaire = self.api_request(Method::GET, url).await?;
        questionnaire.validate()?;
        Ok(questionnaire)
    }

    async fn register(&self, user: &NewUser) -> Result<User, Error> {
        let url = self.get_config().base_url.for_api(&["auth", "register"])?;
        let (headers, body) = json_body(user)?;
        self.api_call(Method::POST, url, headers, body).await
    }
}

impl<T> PublicClient for T where T: BaseClient + Sync {}

#[async_trait]
pub trait SecureClient: PublicClient {
    fn get_session(&self) -> Arc<RwLock<Option<Session>>>;

    async fn fetch_token(&self) -> Result<String, Error> {
        let session = self.get_session();
        let guard = session.read().await;
        guard
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(Error::Unauthenticated)
    }

    async fn auth_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        let token = self.fetch_token().await?;
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(InternalError::from)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    async fn api_authenticated_request<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T, Error> {
        let headers = self.auth_headers().await?;
        self.api_call(method, url, headers, vec![]).await
    }

    async fn api_authenticated_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        content: (HeaderMap, Vec<u8>),
    ) -> Result<T, Error> {
        let (content_headers, body) = content;
        let mut headers = self.auth_headers().await?;
        headers.extend(content_headers);
        self.api_call(method, url, headers, body).await
    }

    async fn me(&self) -> Result<User, Error> {
        let url = self.get_config().base_url.for_api(&["auth", "me"])?;
        self.api_authenticated_request(Method::GET, url).await
    }

    async fn start_assessment(&self, questionnaire_id: &str) -> Result<AssessmentRecord, Error> {
        let url = self.get_config().base_url.for_api(&["assessment", "start"])?;
        let body = json_body(&StartAssessment {
            questionnaire_id: questionnaire_id.to_owned(),
        })?;
        self.api_authenticated_json(Method::POST, url, body).await
    }

    async fn submit_assessment(&self, submission: &AssessmentSubmission) -> Result<SubmissionReceipt, Error> {
        let url = self.get_config().base_url.for_api(&["assessment", "submit"])?;
        let body = json_body(submission)?;
        self.api_authenticated_json(Method::POST, url, body).await
    }

    async fn get_risk_result(&self, assessment_id: &str) -> Result<RiskResult, Error> {
        let url = self
            .get_config()
            .base_url
            .for_api(&["results", "assessment", assessment_id])?;
        self.api_authenticated_request(Method::GET, url).await
    }

    async fn latest_result(&self) -> Result<RiskResult, Error> {
        let url = self.get_config().base_url.for_api(&["results", "user", "latest"])?;
        self.api_authenticated_request(Method::GET, url).await
    }

    async fn history(&self, limit: Option<u32>) -> Result<AssessmentHistory, Error> {
        let mut url = self.get_config().base_url.for_api(&["results", "user", "history"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.unwrap_or(DEFAULT_HISTORY_LIMIT).to_string());
        self.api_authenticated_request(Method::GET, url).await
    }

    async fn resources(&self, risk_level: &RiskLevel) -> Result<ResourceList, Error> {
        let url = self
            .get_config()
            .base_url
            .for_api(&["results", "resources", risk_level.as_str()])?;
        self.api_authenticated_request(Method::GET, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_keeps_base_path() {
        let api = ApiUrl::new(Url::parse("https://example.org/mind").unwrap());
        assert_eq!(
            api.for_api(&["assessment", "questionnaires"]).unwrap().as_str(),
            "https://example.org/mind/api/v1/assessment/questionnaires"
        );
        assert_eq!(api.health().unwrap().as_str(), "https://example.org/mind/health");
    }

    #[test]
    fn test_api_url_encodes_ids() {
        let api = ApiUrl::new(Url::parse("http://localhost:8000/").unwrap());
        assert_eq!(
            api.for_api(&["results", "assessment", "a b/c"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/results/assessment/a%20b%2Fc"
        );
    }
}
