use async_trait::async_trait;

pub type HttpRequest = http::request::Request<Vec<u8>>;

pub type HttpResponse<T> = http::response::Response<T>;

#[async_trait]
pub trait BaseHttpClient: Send + Sync + Default + Clone {
    type Error;

    /// Executes the request and returns the body as text.
    ///
    /// Non-success status codes are reported as errors, the body is kept so callers can surface the
    /// server's message.
    async fn request_text(&self, request: HttpRequest) -> Result<HttpResponse<String>, Self::Error>;
}
