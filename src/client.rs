use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};
use url::Url;

use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const CHAT_PATH: &str = "chat";

/// Body of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The user's message, as typed.
    pub message: String,
    /// Code of the class the conversation belongs to.
    pub class_code: String,
}

/// Body of a successful completion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Reply text in markdown.
    #[serde(alias = "response")]
    pub text: String,
}

/// HTTP client for the assistant service.
#[derive(Debug, Clone)]
pub struct AssistantService {
    api_key: Option<String>,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl AssistantService {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the TUTORIUS_API_KEY
    /// environment variable; without either, requests carry no credentials.
    /// The base URL comes from TUTORIUS_BASE_URL when set.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key
            .or_else(|| env::var("TUTORIUS_API_KEY").ok())
            .filter(|key| !key.is_empty());
        let base_url = base_url
            .or_else(|| env::var("TUTORIUS_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        if let Some(key) = api_key.as_deref() {
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                Error::validation(
                    "API key contains characters not allowed in a header",
                    Some("api_key".to_string()),
                )
            })?;
        }

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
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

    /// The service root every request path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = self.api_key.as_deref()
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {key}"))
        {
            headers.insert(header::AUTHORIZATION, value);
        }
        headers
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed_error = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let error_type = parsed_error.as_ref().and_then(|e| e.error_type.clone());
        let error_message = parsed_error
            .and_then(|e| e.message)
            .unwrap_or_else(|| error_body.trim().to_string());

        match status_code {
            400 => Error::bad_request(error_message),
            401 | 403 => Error::authentication(error_message),
            404 => Error::not_found(error_message, None, None),
            408 | 504 => Error::timeout(error_message, None),
            500..=599 => Error::service_unavailable(error_message, status_code),
            _ => Error::api(status_code, error_type, error_message),
        }
    }

    /// Send one message for a class and return the reply text.
    pub async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = self.base_url.join(CHAT_PATH)?;
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.send_inner(url, request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    async fn send_inner(&self, url: Url, request: &CompletionRequest) -> Result<CompletionResponse> {
        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<CompletionResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl Completion for AssistantService {
    async fn complete(&self, text: &str, class_code: &str) -> Result<String> {
        let request = CompletionRequest {
            message: text.to_string(),
            class_code: class_code.to_string(),
        };
        tracing::debug!(class_code, url = %self.base_url, "sending completion request");
        let response = self.send(&request).await?;
        Ok(response.text)
    }
}

/// Parses a base URL, forcing a trailing slash so relative joins append.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{raw} cannot be used as a base URL"), None));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
