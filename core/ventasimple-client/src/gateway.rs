//! The single request function behind every backend call.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, RequestError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const JSON_MIME: &str = "application/json";
const FALLBACK_MESSAGE: &str = "Request error";

/// Outgoing request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized with `serde_json`.
    Json(Value),
    /// Sent verbatim.
    Text(String),
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON body.
    Json(Value),
    /// Raw body of a non-JSON response.
    Text(String),
}

impl Payload {
    /// The JSON body, if the response was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// The raw body, if the response was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// The JSON value, or an empty object for a text body.
    pub fn into_json(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(_) => Value::Object(Map::new()),
        }
    }

    /// Decodes into a typed record.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        Ok(serde_json::from_value(self.into_json())?)
    }

    /// Decodes an array body. Anything else is an empty list and elements
    /// that do not decode are skipped.
    pub fn decode_list<T: DeserializeOwned>(self) -> Vec<T> {
        match self.into_json() {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A non-empty string `error` field of a JSON body.
    pub fn error_message(&self) -> Option<String> {
        self.as_json()?
            .get("error")?
            .as_str()
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
    }
}

/// Per-call options. Defaults to a bodiless, unauthenticated GET.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Extra headers; these override the defaults.
    pub headers: Vec<(String, String)>,
    /// Sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
    /// Request body, if any.
    pub body: Option<Body>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Bodiless, unauthenticated request with `method`.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    /// `GET` request.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// `POST` request.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// `PATCH` request.
    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    /// `DELETE` request.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Authenticates with `token`.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Adds a header, overriding a default of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sends `body` as JSON.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Sends `body` verbatim.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }
}

/// Thin wrapper over a shared `reqwest::Client` bound to one backend.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: Client,
    base_url: String,
}

impl Gateway {
    /// Builds the HTTP client for `config`.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the base URL and `path`, adding a leading slash if needed.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Executes one call.
    ///
    /// A JSON content type is parsed (an unparseable body becomes `{}`);
    /// any other body is returned as text. Non-2xx responses become
    /// [`RequestError`].
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult<Payload> {
        let url = self.url(path);
        let headers = build_headers(&options)?;

        let mut builder = self
            .http
            .request(options.method.clone(), &url)
            .headers(headers);
        match options.body {
            Some(Body::Json(value)) => builder = builder.body(serde_json::to_string(&value)?),
            Some(Body::Text(text)) => builder = builder.body(text),
            None => {}
        }

        debug!(method = %options.method, %url, "backend request");
        let response = builder.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(JSON_MIME));
        let text = response.text().await?;

        let payload = if is_json {
            Payload::Json(serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Map::new())))
        } else {
            Payload::Text(text)
        };

        if !status.is_success() {
            let message = payload
                .error_message()
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            warn!(status = status.as_u16(), %url, %message, "backend request failed");
            return Err(RequestError {
                message,
                status: status.as_u16(),
                body: payload,
            }
            .into());
        }

        Ok(payload)
    }
}

fn build_headers(options: &RequestOptions) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));

    if let Some(token) = &options.bearer {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::Config("token is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::Config(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::Config(format!("invalid value for header {name}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
