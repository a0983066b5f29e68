//! Mock translator for testing
//!
//! A deterministic, network-free engine for exercising the gateway and CLI
//! without API keys.
//!
//! # Example
//!
//! ```ignore
//! use gdgate::Translator;
//! use gdgate_engines::{MockMode, MockTranslator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("en", "fr", "hello").await;
//!     assert_eq!(result.data, "hello_fr");
//! }
//! ```

use async_trait::async_trait;
use gdgate::{Method, TranslateError, TranslationResult, Translator};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "hello" → "hello_fr"
    Suffix,

    /// Fail every request with the given error
    Error(TranslateError),
}

#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self { mode }
    }

    fn apply_translation(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Error(err) => Err(err.clone()),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult {
        if text.is_empty() {
            return TranslateError::EmptyInput.into();
        }

        match self.apply_translation(text, target_lang) {
            Ok(data) => TranslationResult::success(
                0,
                data,
                Vec::new(),
                source_lang,
                target_lang,
                Method::Mock,
            ),
            Err(e) => e.into(),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_suffix_single_translation() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = mock.translate("en", "fr", "hello").await;
        assert_eq!(result.data, "hello_fr");
        assert_eq!(result.method, Some(Method::Mock));
    }

    #[tokio::test]
    async fn test_suffix_different_targets() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.translate("en", "fr", "hello").await.data, "hello_fr");
        assert_eq!(mock.translate("en", "pt-BR", "hello").await.data, "hello_pt-BR");
    }

    #[tokio::test]
    async fn test_empty_text_is_not_found() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.translate("en", "fr", "").await.code, 404);
    }

    #[tokio::test]
    async fn test_error_mode_returns_failure() {
        let mock = MockTranslator::new(MockMode::Error(TranslateError::QuotaExceeded));
        let result = mock.translate("en", "fr", "hello").await;
        assert_eq!(result.code, 429);
        assert_eq!(result.message, "Too many requests");
    }

    #[test]
    fn test_provider_name() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.provider_name(), "Mock Translator");
    }
}
