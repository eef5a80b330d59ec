// HTTP transport used by the adapter; reqwest by default, scripted in tests

use async_trait::async_trait;
use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Client error: {0}")]
    Client(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-type".to_string(), "application/json".to_string())],
            body: Some(body.into()),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a completed request, kept verbatim for callers that
/// need to inspect what the server actually sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

// Identifies the adapter to the server; falls back to a plain client if the
// configured one cannot be built
impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new().unwrap_or_else(|err| {
            warn!(error = %err, "using default HTTP client");
            Self::with_client(reqwest::Client::new())
        })
    }
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::mock_transport::MockTransport;
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let request = HttpRequest::post_json("http://localhost/book", "{}");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_get_has_no_body() {
        let request = HttpRequest::get("http://localhost/slots");
        assert_eq!(request.method.to_string(), "GET");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::new(200, "{\"ok\":true}");
        assert!(response.is_ok());
        assert_eq!(response.text(), "{\"ok\":true}");
        assert!(!HttpResponse::new(201, "").is_ok());
    }

    #[test]
    fn test_reqwest_transport_builds_configured_client() {
        assert!(ReqwestTransport::new().is_ok());
        let _ = ReqwestTransport::default();
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockTransport::new();
        mock.respond_with(200, "first");
        mock.fail_with(TransportError::Network("down".to_string()));

        let first = mock.send(HttpRequest::get("http://a")).await.unwrap();
        assert_eq!(first.text(), "first");

        let second = mock.send(HttpRequest::get("http://b")).await;
        assert_eq!(second, Err(TransportError::Network("down".to_string())));

        let third = mock.send(HttpRequest::get("http://c")).await;
        assert!(third.is_err());

        assert_eq!(mock.request_count(), 3);
        assert_eq!(mock.last_request().unwrap().url, "http://c");
    }
}
