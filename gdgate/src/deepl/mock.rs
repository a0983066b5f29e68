//! Scripted transport for testing
//!
//! Replays queued responses in order and records every request it sees, so
//! tests can assert on call counts, call order and request bodies without
//! network access.
//!
//! # Example
//!
//! ```ignore
//! use gdgate::deepl::mock::MockTransport;
//!
//! let transport = MockTransport::new();
//! transport.push_json(serde_json::json!({"result": {"texts": [{"text": "Hallo"}]}}));
//! ```

use crate::deepl::transport::{HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with a raw body
    pub fn push_body(&self, body: Vec<u8>) -> &Self {
        self.push(Ok(HttpResponse { status: 200, body }))
    }

    /// Queue a 200 response with a JSON body
    pub fn push_json(&self, value: serde_json::Value) -> &Self {
        self.push_body(value.to_string().into_bytes())
    }

    /// Queue a bare status failure, e.g. 429
    pub fn push_status(&self, status: u16) -> &Self {
        self.push_error(TransportError::Status {
            status,
            body: Vec::new(),
        })
    }

    pub fn push_error(&self, error: TransportError) -> &Self {
        self.push(Err(error))
    }

    fn push(&self, reply: Result<HttpResponse, TransportError>) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
        self
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted reply".to_string())))
    }
}
