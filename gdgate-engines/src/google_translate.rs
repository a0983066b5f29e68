//! Google Cloud Translation API v2 engine
//!
//! # Authentication
//!
//! The API key comes from the `[google] app_secret` config value, or from the
//! `GOOGLE_TRANSLATE_API_KEY` environment variable via [`GoogleTranslateProvider::from_env`].
//! Obtain a key from https://console.cloud.google.com/
//!
//! # Example
//!
//! ```ignore
//! use gdgate::Translator;
//! use gdgate_engines::GoogleTranslateProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("en", "fr", "Hello, world!").await;
//!     println!("{}", result.data);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use gdgate::deepl::transport::{HttpRequest, Transport};
use gdgate::{
    Method, ReqwestTransport, TranslateError, TranslateResult, TranslationResult, Translator,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// Transport used for every request
    transport: Arc<dyn Transport>,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    pub const DEFAULT_BASE_URL: &'static str =
        "https://translation.googleapis.com/language/translate/v2";

    /// Create a provider with an explicit API key and transport
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(TranslateError::Config)` - If the API key is empty
    pub fn new(api_key: String, transport: Arc<dyn Transport>) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config("API key cannot be empty".to_string()));
        }

        Ok(Self {
            api_key,
            transport,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> TranslateResult<Self> {
        let api_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").map_err(|_| {
            TranslateError::Config(
                "GOOGLE_TRANSLATE_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::new(api_key, Arc::new(ReqwestTransport::default()))
    }

    async fn request_translation(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslateResult<(String, Option<String>)> {
        if text.chars().count() > Self::MAX_CHARS_PER_STRING {
            return Err(TranslateError::Provider(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        let mut body = json!({
            "q": [text],
            "target": target_lang,
            "format": "text"
        });
        // Google detects the source language when it is omitted
        if !source_lang.is_empty() && !source_lang.eq_ignore_ascii_case("auto") {
            body["source"] = json!(source_lang);
        }

        // The key travels in a header, never in the URL
        let request = HttpRequest::post(self.base_url.as_str(), body.to_string().into_bytes())
            .with_header("X-Goog-Api-Key", self.api_key.as_str())
            .with_header("Content-Type", "application/json");

        let response = self.transport.send(request).await.map_err(|e| {
            TranslateError::Provider(format!("Google Translate request failed: {}", e))
        })?;

        let json: serde_json::Value = serde_json::from_slice(&response.body).map_err(|e| {
            TranslateError::Provider(format!("Failed to parse API response: {}", e))
        })?;

        // Extract translations from nested response
        let first = &json["data"]["translations"][0];
        let translated = first["translatedText"].as_str().ok_or_else(|| {
            TranslateError::Provider(
                "Invalid API response: missing 'translatedText' field".to_string(),
            )
        })?;
        let detected = first["detectedSourceLanguage"].as_str().map(str::to_string);

        Ok((translated.to_string(), detected))
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Translator for GoogleTranslateProvider {
    async fn translate(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult {
        if text.is_empty() {
            return TranslateError::EmptyInput.into();
        }

        match self.request_translation(source_lang, target_lang, text).await {
            Ok((translated, _)) if translated.is_empty() => TranslateError::EmptyResult.into(),
            Ok((translated, detected)) => TranslationResult::success(
                0,
                translated,
                Vec::new(),
                detected.as_deref().unwrap_or(source_lang),
                target_lang,
                Method::Google,
            ),
            Err(e) => {
                warn!(error = %e, "Google Translate failed");
                e.into()
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdgate::TransportError;
    use gdgate::deepl::mock::MockTransport;
    use serde_json::Value;

    fn provider(transport: &Arc<MockTransport>) -> GoogleTranslateProvider {
        GoogleTranslateProvider::new("test-api-key".to_string(), transport.clone()).unwrap()
    }

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_empty_key() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::new());
        let result = GoogleTranslateProvider::new("".to_string(), transport);
        match result {
            Err(TranslateError::Config(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_new_with_whitespace_key() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::new());
        assert!(GoogleTranslateProvider::new("   ".to_string(), transport).is_err());
    }

    // ========== Translation Tests ==========

    #[tokio::test]
    async fn test_translate_success() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({
            "data": {"translations": [{
                "translatedText": "Bonjour",
                "detectedSourceLanguage": "en"
            }]}
        }));

        let result = provider(&transport).translate("", "fr", "Hello").await;
        assert!(result.is_success());
        assert_eq!(result.data, "Bonjour");
        assert_eq!(result.source_lang, "en");
        assert_eq!(result.method, Some(Method::Google));

        let requests = transport.requests();
        assert_eq!(requests[0].url, GoogleTranslateProvider::DEFAULT_BASE_URL);
        assert_eq!(requests[0].header("X-Goog-Api-Key"), Some("test-api-key"));
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["q"], json!(["Hello"]));
        assert_eq!(body["target"], "fr");
        assert!(body.get("source").is_none());
    }

    #[tokio::test]
    async fn test_translate_sends_explicit_source() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"data": {"translations": [{"translatedText": "Hola"}]}}));

        let result = provider(&transport).translate("en", "es", "Hello").await;
        assert_eq!(result.source_lang, "en");

        let body: Value = serde_json::from_slice(&transport.requests()[0].body).unwrap();
        assert_eq!(body["source"], "en");
    }

    #[tokio::test]
    async fn test_translate_empty_text() {
        let transport = Arc::new(MockTransport::new());
        let result = provider(&transport).translate("en", "fr", "").await;
        assert_eq!(result.code, 404);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_text_too_long() {
        let transport = Arc::new(MockTransport::new());
        let long_text = "x".repeat(GoogleTranslateProvider::MAX_CHARS_PER_STRING + 1);
        let result = provider(&transport).translate("en", "fr", &long_text).await;
        assert_eq!(result.code, 502);
        assert!(result.message.contains("exceeds maximum"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_api_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error(TransportError::Status {
            status: 400,
            body: b"API key not valid".to_vec(),
        });
        let result = provider(&transport).translate("en", "fr", "Hello").await;
        assert_eq!(result.code, 502);
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_failure_message_does_not_leak_key() {
        let transport = Arc::new(
            ReqwestTransport::new(None).with_timeout(std::time::Duration::from_secs(2)),
        );
        let provider = GoogleTranslateProvider {
            base_url: "http://127.0.0.1:9/language/translate/v2".to_string(),
            ..GoogleTranslateProvider::new("SECRET-API-KEY".to_string(), transport).unwrap()
        };

        let result = provider.translate("en", "fr", "Hello").await;
        assert_eq!(result.code, 502);
        assert!(result.message.contains("Google Translate request failed"));
        assert!(!result.message.contains("SECRET-API-KEY"));
    }

    #[tokio::test]
    async fn test_translate_missing_field() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"data": {"translations": []}}));
        let result = provider(&transport).translate("en", "fr", "Hello").await;
        assert!(result.message.contains("translatedText"));
    }

    // ========== Provider Name / Debug Tests ==========

    #[test]
    fn test_provider_name() {
        let transport = Arc::new(MockTransport::new());
        assert_eq!(provider(&transport).provider_name(), "Google Translate");
    }

    #[test]
    fn test_debug_output() {
        let transport = Arc::new(MockTransport::new());
        let debug_str = format!("{:?}", provider(&transport));
        // API key should be masked
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("test-api-key"));
    }

    // ========== Integration Tests (require real API key) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_api_single_translation() {
        if std::env::var("GOOGLE_TRANSLATE_API_KEY").is_err() {
            eprintln!("Skipping: GOOGLE_TRANSLATE_API_KEY not set");
            return;
        }

        let provider = GoogleTranslateProvider::from_env().unwrap();
        let result = provider.translate("en", "fr", "Hello").await;
        println!("Translation: {} → {}", "Hello", result.data);
        assert!(result.is_success());
    }
}
