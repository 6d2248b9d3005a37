use async_trait::async_trait;
use std::time::Duration;

use crate::core::{BaseHttpClient, HttpRequest, HttpResponse};
use crate::error::Error;
use reqwest::{Request, Response};
use tokio::time::timeout;

#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new().expect("failed to create default client")
    }
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, Error> {
        let mut client_builder = reqwest::ClientBuilder::new();
        client_builder = client_builder.redirect(reqwest::redirect::Policy::none());

        let client = client_builder.build()?;

        Ok(Self { client, timeout: None })
    }

    /// Bounds every request by `timeout`. Without it a stalled server stalls the caller.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_request(&self, request: HttpRequest) -> Result<Request, Error> {
        let (parts, body) = request.into_parts();
        let mut request_builder = self.client.request(parts.method, parts.uri.to_string());
        for (name, value) in &parts.headers {
            request_builder = request_builder.header(name.as_str(), value.as_bytes());
        }
        request_builder.body(body).build().map_err(Into::into)
    }

    async fn execute_request(&self, request: HttpRequest) -> Result<Response, Error> {
        let request = self.build_request(request)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "Executing request");
        let response = self.client.execute(request);
        let response = match self.timeout {
            Some(duration) => timeout(duration, response).await.map_err(|_| Error::Timeout)?,
            None => response.await,
        };
        response.map_err(Into::into)
    }
}

#[async_trait]
impl BaseHttpClient for ReqwestHttpClient {
    type Error = Error;

    async fn request_text(&self, request: HttpRequest) -> Result<HttpResponse<String>, Self::Error> {
        let response = self.execute_request(request).await?;
        let status_code = response.status();

        if status_code.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await?;

            let mut http_response = http::response::Response::builder().status(status_code);
            if let Some(header_map) = http_response.headers_mut() {
                header_map.extend(headers);
            }

            http_response.body(text).map_err(Into::into)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status_code, "Request failed");
            Err(Error::StatusCode {
                status: status_code,
                body,
            })
        }
    }
}
