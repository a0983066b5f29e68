//! Authenticated DeepL REST API, used only as a fallback
//!
//! Keys ending in `:fx` belong to free accounts and are served from
//! `api-free.deepl.com`; every other key goes to `api.deepl.com`.

use crate::deepl::transport::{HttpRequest, Transport};
use crate::error::{TranslateError, TranslateResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub const FREE_API_BASE: &str = "https://api-free.deepl.com";
pub const PRO_API_BASE: &str = "https://api.deepl.com";

/// Ordered candidate keys parsed from comma-separated input
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthKeyPool {
    keys: Vec<String>,
}

impl AuthKeyPool {
    /// Entries are trimmed and empty ones dropped; order is preserved
    pub fn parse(input: &str) -> Self {
        Self {
            keys: input
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl fmt::Debug for AuthKeyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKeyPool")
            .field("keys", &self.keys.iter().map(|k| mask_key(k)).collect::<Vec<_>>())
            .finish()
    }
}

/// Last four characters of a key, for logs
pub fn mask_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", tail)
}

/// API base URL for a key
pub fn api_base(key: &str) -> &'static str {
    if key.ends_with(":fx") {
        FREE_API_BASE
    } else {
        PRO_API_BASE
    }
}

/// Body of `/v2/usage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Usage {
    pub character_count: u64,
    pub character_limit: u64,
}

impl Usage {
    /// Not consulted during fallback: a recognized key is enough
    pub fn has_headroom(&self) -> bool {
        self.character_count < self.character_limit
    }
}

#[derive(Debug, Serialize)]
struct TranslatePayload<'a> {
    text: Vec<&'a str>,
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
}

/// Client for the official endpoints, sharing the free channel's transport
pub struct OfficialClient<'a> {
    transport: &'a dyn Transport,
}

impl<'a> OfficialClient<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    fn authorized(request: HttpRequest, key: &str) -> HttpRequest {
        request.with_header("Authorization", format!("DeepL-Auth-Key {}", key))
    }

    /// Query `/v2/usage`; any parseable answer means the key is recognized
    pub async fn check_usage(&self, key: &str) -> TranslateResult<Usage> {
        let url = format!("{}/v2/usage", api_base(key));
        let request = Self::authorized(HttpRequest::get(url), key);

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(key = %mask_key(key), error = %e, "usage check failed");
            TranslateError::from(e)
        })?;

        let usage: Usage = serde_json::from_slice(&response.body).map_err(|e| {
            warn!(key = %mask_key(key), error = %e, "usage response unreadable");
            TranslateError::Transport(format!("invalid usage response: {}", e))
        })?;
        debug!(
            key = %mask_key(key),
            count = usage.character_count,
            limit = usage.character_limit,
            "usage check succeeded"
        );
        Ok(usage)
    }

    /// Translate through `/v2/translate`
    ///
    /// The text is sent as newline-split segments and the returned segments
    /// are concatenated without separators.
    pub async fn translate(
        &self,
        key: &str,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslateResult<String> {
        let source_lang = match source_lang {
            "" => None,
            lang if lang.eq_ignore_ascii_case("auto") => None,
            lang => Some(lang),
        };
        let payload = TranslatePayload {
            text: text.split('\n').collect(),
            target_lang,
            source_lang,
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|e| TranslateError::Transport(format!("failed to encode payload: {}", e)))?;

        let url = format!("{}/v2/translate", api_base(key));
        let request = Self::authorized(HttpRequest::post(url, body), key)
            .with_header("Content-Type", "application/json");

        let response = self.transport.send(request).await?;
        let parsed: TranslationResponse = serde_json::from_slice(&response.body)
            .map_err(|e| TranslateError::Transport(format!("invalid translate response: {}", e)))?;

        Ok(parsed
            .translations
            .into_iter()
            .map(|t| t.text)
            .collect::<String>())
    }
}
