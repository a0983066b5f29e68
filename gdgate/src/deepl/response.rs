//! Free-channel response classification

use crate::error::{TranslateError, TranslateResult};
use serde_json::Value;
use tracing::warn;

/// JSON-RPC "invalid request" code; the server uses it for unsupported languages
pub const INVALID_REQUEST_CODE: i64 = -32600;

/// Text extracted from a successful free-channel response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeTranslation {
    pub text: String,
    pub alternatives: Vec<String>,
}

/// Classify a raw response body
///
/// The invalid-request sentinel wins over everything else in the body. A body
/// that is not JSON, or whose first text is missing or empty, is an
/// [`TranslateError::EmptyResult`].
pub fn interpret(body: &[u8]) -> TranslateResult<FreeTranslation> {
    let json: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    if json["error"]["code"].as_i64() == Some(INVALID_REQUEST_CODE) {
        warn!(error = %json["error"], "free channel rejected the request");
        return Err(TranslateError::ProtocolRejected);
    }

    let first = &json["result"]["texts"][0];
    let text = first["text"].as_str().unwrap_or_default();
    if text.is_empty() {
        return Err(TranslateError::EmptyResult);
    }

    let alternatives = first["alternatives"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item["text"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(FreeTranslation {
        text: text.to_string(),
        alternatives,
    })
}
