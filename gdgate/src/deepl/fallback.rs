//! Free-channel attempt with authenticated fallback
//!
//! ```text
//! TryFree ──429 + keys──▶ ValidateKeys ──first valid key──▶ RetryOfficial ──▶ Done
//!    │                        │
//!    └──anything else──▶ Done └──no valid key──▶ Done (QuotaExceeded)
//! ```
//!
//! The fallback runs at most once per query and never loops back to the
//! free channel.

use crate::deepl::official::{AuthKeyPool, OfficialClient, mask_key};
use crate::deepl::request::TranslationRequest;
use crate::deepl::response;
use crate::deepl::transport::{Transport, free_channel_request};
use crate::error::TranslateError;
use crate::translator::{Method, TranslationResult};
use tracing::{debug, info, warn};

/// Id reported for results produced by the official channel
pub const OFFICIAL_RESULT_ID: i64 = 1_000_000;

#[derive(Debug)]
enum Stage {
    TryFree,
    ValidateKeys,
    RetryOfficial { key: String },
    Done(TranslationResult),
}

pub struct FallbackCoordinator<'a> {
    transport: &'a dyn Transport,
    auth_keys: &'a AuthKeyPool,
}

impl<'a> FallbackCoordinator<'a> {
    pub fn new(transport: &'a dyn Transport, auth_keys: &'a AuthKeyPool) -> Self {
        Self {
            transport,
            auth_keys,
        }
    }

    /// Drive the state machine to completion
    pub async fn run(&self, request: &TranslationRequest) -> TranslationResult {
        let mut stage = Stage::TryFree;
        loop {
            debug!(?stage, id = request.id, "fallback stage");
            stage = match stage {
                Stage::TryFree => self.try_free(request).await,
                Stage::ValidateKeys => self.validate_keys().await,
                Stage::RetryOfficial { key } => self.retry_official(request, &key).await,
                Stage::Done(result) => return result,
            };
        }
    }

    async fn try_free(&self, request: &TranslationRequest) -> Stage {
        let outbound = free_channel_request(request.to_bytes());

        let body = match self.transport.send(outbound).await {
            Ok(response) => response.body,
            Err(e) if e.is_too_many_requests() => {
                if self.auth_keys.is_empty() {
                    warn!(id = request.id, "free channel rate limited, no keys configured");
                    return Stage::Done(TranslateError::QuotaExceeded.into());
                }
                info!(
                    id = request.id,
                    keys = self.auth_keys.len(),
                    "free channel rate limited, trying official API"
                );
                return Stage::ValidateKeys;
            }
            Err(e) => {
                warn!(id = request.id, error = %e, "free channel request failed");
                return Stage::Done(TranslateError::from(e).into());
            }
        };

        Stage::Done(match response::interpret(&body) {
            Ok(translation) => TranslationResult::success(
                request.id,
                translation.text,
                translation.alternatives,
                &request.source_lang,
                &request.target_lang,
                Method::Free,
            ),
            Err(e) => e.into(),
        })
    }

    async fn validate_keys(&self) -> Stage {
        let client = OfficialClient::new(self.transport);
        for key in self.auth_keys.keys() {
            if client.check_usage(key).await.is_ok() {
                info!(key = %mask_key(key), "using authenticated key");
                return Stage::RetryOfficial { key: key.clone() };
            }
        }
        warn!("no authenticated key passed validation");
        Stage::Done(TranslateError::QuotaExceeded.into())
    }

    async fn retry_official(&self, request: &TranslationRequest, key: &str) -> Stage {
        let client = OfficialClient::new(self.transport);
        let outcome = client
            .translate(key, &request.source_lang, &request.target_lang, &request.text)
            .await;

        Stage::Done(match outcome {
            Ok(text) => TranslationResult::success(
                OFFICIAL_RESULT_ID,
                text,
                Vec::new(),
                &request.source_lang,
                &request.target_lang,
                Method::OfficialApi,
            ),
            Err(e) => {
                warn!(key = %mask_key(key), error = %e, "official API request failed");
                TranslateError::QuotaExceeded.into()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deepl::mock::MockTransport;
    use crate::deepl::transport::FREE_CHANNEL_URL;
    use crate::error::TransportError;
    use serde_json::json;

    fn request() -> TranslationRequest {
        TranslationRequest::with_id(8_300_000_001, "EN", "DE", "Hello world")
    }

    fn free_success() -> serde_json::Value {
        json!({"result": {"texts": [{
            "text": "Hallo Welt",
            "alternatives": [{"text": "Hallo, Welt"}]
        }]}})
    }

    fn usage_ok() -> serde_json::Value {
        json!({"character_count": 10, "character_limit": 500000})
    }

    #[tokio::test]
    async fn test_free_success() {
        let transport = MockTransport::new();
        transport.push_json(free_success());
        let keys = AuthKeyPool::parse("unused");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 200);
        assert_eq!(result.id, 8_300_000_001);
        assert_eq!(result.data, "Hallo Welt");
        assert_eq!(result.alternatives, vec!["Hallo, Welt"]);
        assert_eq!(result.source_lang, "EN");
        assert_eq!(result.target_lang, "DE");
        assert_eq!(result.method, Some(Method::Free));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_free_failure_does_not_fall_back() {
        let transport = MockTransport::new();
        transport.push_json(json!({"error": {"code": -32600}}));
        let keys = AuthKeyPool::parse("a,b");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 406);
        assert_eq!(result.message, "Invalid target language");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_other_status_is_transport_failure() {
        let transport = MockTransport::new();
        transport.push_status(500);
        let keys = AuthKeyPool::parse("a");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 503);
        assert_eq!(result.message, "DeepL API request failed");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_without_keys() {
        let transport = MockTransport::new();
        transport.push_status(429);
        let keys = AuthKeyPool::default();

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 429);
        assert_eq!(result.message, "Too many requests");
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.requests()[0].url, FREE_CHANNEL_URL);
    }

    #[tokio::test]
    async fn test_rate_limited_second_key_valid() {
        let transport = MockTransport::new();
        transport
            .push_status(429)
            .push_status(403)
            .push_json(usage_ok())
            .push_json(json!({"translations": [{"text": "Hallo Welt"}]}));
        let keys = AuthKeyPool::parse("bad-key,good-key:fx");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 200);
        assert_eq!(result.method, Some(Method::OfficialApi));
        assert_eq!(result.id, OFFICIAL_RESULT_ID);
        assert_eq!(result.data, "Hallo Welt");

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].url, FREE_CHANNEL_URL);
        assert_eq!(requests[1].url, "https://api.deepl.com/v2/usage");
        assert_eq!(requests[1].header("Authorization"), Some("DeepL-Auth-Key bad-key"));
        assert_eq!(requests[2].url, "https://api-free.deepl.com/v2/usage");
        assert_eq!(
            requests[2].header("Authorization"),
            Some("DeepL-Auth-Key good-key:fx")
        );
        assert_eq!(requests[3].url, "https://api-free.deepl.com/v2/translate");
        assert_eq!(
            requests[3].header("Authorization"),
            Some("DeepL-Auth-Key good-key:fx")
        );
    }

    #[tokio::test]
    async fn test_first_valid_key_wins() {
        let transport = MockTransport::new();
        transport
            .push_status(429)
            .push_json(usage_ok())
            .push_json(json!({"translations": [{"text": "Hallo"}]}));
        let keys = AuthKeyPool::parse("one,two,three");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.method, Some(Method::OfficialApi));

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(
            requests
                .iter()
                .skip(1)
                .all(|r| r.header("Authorization") == Some("DeepL-Auth-Key one"))
        );
    }

    #[tokio::test]
    async fn test_no_key_validates() {
        let transport = MockTransport::new();
        transport
            .push_status(429)
            .push_status(403)
            .push_body(b"garbage".to_vec());
        let keys = AuthKeyPool::parse("a,b");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 429);
        // free + two usage checks, no translate call
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_official_failure_reports_quota_exceeded() {
        let transport = MockTransport::new();
        transport
            .push_status(429)
            .push_json(usage_ok())
            .push_error(TransportError::Status {
                status: 456,
                body: Vec::new(),
            });
        let keys = AuthKeyPool::parse("only");

        let result = FallbackCoordinator::new(&transport, &keys).run(&request()).await;
        assert_eq!(result.code, 429);
        assert!(result.method.is_none());
        assert_eq!(transport.call_count(), 3);
    }
}
