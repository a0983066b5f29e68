//! HTTP exchange for the free and official channels
//!
//! [`Transport`] is the seam between protocol logic and the network. The
//! production [`ReqwestTransport`] builds a fresh client per call so the proxy
//! setting is a plain per-call input; tests use
//! [`MockTransport`](crate::deepl::mock::MockTransport).

use crate::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Internal JSON-RPC endpoint used by the mobile app
pub const FREE_CHANNEL_URL: &str = "https://www2.deepl.com/jsonrpc";

/// Header set sent by the DeepL iOS app
pub const MOBILE_CLIENT_HEADERS: [(&str, &str); 11] = [
    ("Content-Type", "application/json"),
    ("Accept", "*/*"),
    ("x-app-os-name", "iOS"),
    ("x-app-os-version", "16.3.0"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("x-app-device", "iPhone13,2"),
    ("User-Agent", "DeepL-iOS/2.9.1 iOS 16.3.0 (iPhone13,2)"),
    ("x-app-build", "510265"),
    ("x-app-version", "2.9.1"),
    ("Connection", "keep-alive"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outbound request, independent of the HTTP library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// First header value with a case-insensitive name match
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Free-channel POST carrying the mobile client's headers
pub fn free_channel_request(payload: Vec<u8>) -> HttpRequest {
    let mut request = HttpRequest::post(FREE_CHANNEL_URL, payload);
    for (name, value) in MOBILE_CLIENT_HEADERS {
        request = request.with_header(name, value);
    }
    request
}

/// `url` without its query string, for logs
pub fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// Successful (2xx) response with a decoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs exactly one HTTP exchange per call, without retries
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`; non-2xx statuses come back as [`TransportError::Status`]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport with an optional upstream proxy
///
/// Brotli bodies are decoded by reqwest when the response carries
/// `Content-Encoding: br`; every other body is passed through untouched.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    proxy_url: Option<String>,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Default per-request deadline
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// `proxy_url` may be an http, https or socks5 URL; empty means direct
    pub fn new(proxy_url: Option<&str>) -> Self {
        Self {
            proxy_url: proxy_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    fn client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        builder = match &self.proxy_url {
            Some(url) => {
                let proxy = reqwest::Proxy::all(url.as_str()).map_err(|e| TransportError::Proxy {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        builder
            .build()
            .map_err(|e| TransportError::Connect(format!("failed to create HTTP client: {}", e)))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = self.client()?;

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.url),
            HttpMethod::Post => client.post(&request.url).body(request.body),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(
            url = %redact_query(&request.url),
            method = ?request.method,
            "sending request"
        );
        // reqwest errors embed the full URL, query credentials included
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                TransportError::Connect(format!("failed to read body: {}", e.without_url()))
            })?
            .to_vec();
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}
