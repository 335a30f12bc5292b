use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{CompletionRequest, CompletionResponse, ModelListResponse};

/// Base URL of Groq's OpenAI-compatible API.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Something that turns a [`CompletionRequest`] into reply text.
///
/// The session talks to the provider only through this trait.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one request and waits for the complete reply.
    ///
    /// Implementations must not retry.  A non-200 answer is [`Error::HttpStatus`], a request that
    /// never got an answer is a transport error, and a 200 answer of unexpected shape is
    /// [`Error::Serialization`].
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Something that can list the model identifiers a provider serves.
#[async_trait::async_trait]
pub trait ModelSource: Send + Sync {
    /// Lists model identifiers in provider order.
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Client for Groq's OpenAI-compatible chat-completion API.
///
/// Any provider that speaks the same protocol works when constructed with its base URL.
#[derive(Debug, Clone)]
pub struct Groq {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl Groq {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the GROQ_API_KEY environment variable.
    /// A missing key is not an error here; the provider will reject the requests instead.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// Without a timeout the transport default applies.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).unwrap_or_else(|_| {
                tracing::warn!("{API_KEY_ENV} is not set; requests will fail authorization");
                String::new()
            }),
        };

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| Error::validation("API key contains invalid characters", None))?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Turns anything but a 200 into [`Error::HttpStatus`] with the body verbatim.
    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        Err(Error::http_status(status.as_u16(), body))
    }

    async fn read_body(&self, response: Response) -> Result<String> {
        response.text().await.map_err(|e| self.transport_error(e))
    }
}

#[async_trait::async_trait]
impl CompletionClient for Groq {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = self.endpoint("chat/completions")?;
        let start = Instant::now();
        CLIENT_REQUESTS.click();
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            temperature = request.temperature,
            "sending completion request"
        );

        let result: Result<String> = async {
            let response = self
                .client
                .post(url)
                .headers(self.default_headers()?)
                .json(request)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;
            let response = self.check_status(response).await?;
            let body = self.read_body(response).await?;
            let parsed: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })?;
            parsed.into_text()
        }
        .await;

        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            tracing::warn!(error = %err, "completion request failed");
        }
        result
    }
}

#[async_trait::async_trait]
impl ModelSource for Groq {
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.endpoint("models")?;
        let response = self
            .client
            .get(url)
            .headers(self.default_headers()?)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = self.check_status(response).await?;
        let body = self.read_body(response).await?;
        let parsed: ModelListResponse = serde_json::from_str(&body)?;
        Ok(parsed.ids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Groq::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout, None);

        let client = Groq::with_options(
            Some("test-key".to_string()),
            Some("http://localhost:8080/v1".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:8080/v1/");
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn endpoints_resolve_under_base() {
        let client = Groq::new(Some("k".to_string())).unwrap();
        assert_eq!(
            client.endpoint("chat/completions").unwrap().as_str(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            client.endpoint("models").unwrap().as_str(),
            "https://api.groq.com/openai/v1/models"
        );
    }

    #[test]
    fn bearer_header() {
        let client = Groq::new(Some("secret".to_string())).unwrap();
        let headers = client.default_headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer secret");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn bad_base_url() {
        let err = Groq::with_options(Some("k".to_string()), Some("not a url".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let client = Groq::with_options(
            Some("k".to_string()),
            Some("http://127.0.0.1:9/v1/".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let request = CompletionRequest::new("m", vec![], 0.5);
        let err = client.complete(&request).await.unwrap_err();
        assert!(err.is_transport(), "{err:?}");
        assert!(client.list_models().await.is_err());
    }
}
