//! Translation engine trait and the result type every engine produces
//!
//! The gateway routes each query to one [`Translator`]. Engines never
//! return `Err`: failures are folded into the [`TranslationResult`] with an
//! HTTP-style status code, so the routing layer decides how to display them.
//!
//! # Example
//!
//! ```ignore
//! use gdgate::{DeepLTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let translator = DeepLTranslator::direct("", None);
//!     let result = translator.translate("EN", "DE", "Hello, world!").await;
//!     if result.is_success() {
//!         println!("{}", result.data);
//!     } else {
//!         eprintln!("{} {}", result.code, result.message);
//!     }
//! }
//! ```

use crate::error::TranslateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic trait for translation backends
///
/// Implemented by the DeepL free channel and by every sibling engine.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` into `target_lang`
    ///
    /// An empty `source_lang` means the caller wants auto-detection; engines
    /// pass it through untouched.
    async fn translate(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult;

    /// Name used in logs
    fn provider_name(&self) -> &str;
}

/// Which channel produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "Free")]
    Free,
    #[serde(rename = "Official API")]
    OfficialApi,
    #[serde(rename = "Google")]
    Google,
    #[serde(rename = "OpenAI")]
    OpenAi,
    #[serde(rename = "Mock")]
    Mock,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Method::Free => "Free",
            Method::OfficialApi => "Official API",
            Method::Google => "Google",
            Method::OpenAi => "OpenAI",
            Method::Mock => "Mock",
        };
        f.write_str(tag)
    }
}

/// Outcome of one translation query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// HTTP-style status (200 on success)
    pub code: u16,
    /// Request id; official-channel results carry a fixed sentinel
    pub id: i64,
    /// "Success" or the failure description
    pub message: String,
    /// Primary translation, empty on failure
    pub data: String,
    /// Alternative translations in server order
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
}

impl TranslationResult {
    pub fn success(
        id: i64,
        data: String,
        alternatives: Vec<String>,
        source_lang: &str,
        target_lang: &str,
        method: Method,
    ) -> Self {
        Self {
            code: 200,
            id,
            message: "Success".to_string(),
            data,
            alternatives,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            method: Some(method),
        }
    }

    pub fn failure(err: &TranslateError) -> Self {
        Self {
            code: err.status_code(),
            id: 0,
            message: err.to_string(),
            data: String::new(),
            alternatives: Vec::new(),
            source_lang: String::new(),
            target_lang: String::new(),
            method: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

impl From<TranslateError> for TranslationResult {
    fn from(err: TranslateError) -> Self {
        Self::failure(&err)
    }
}

/// Split a language code into its base code and regional variant
///
/// - `pt-BR` → (`pt`, `Some("pt-BR")`)
/// - `EN` → (`EN`, `None`)
///
/// Case is preserved; the vendor accepts both spellings.
pub fn split_language(code: &str) -> (&str, Option<&str>) {
    match code.split_once('-') {
        Some((base, _)) => (base, Some(code)),
        None => (code, None),
    }
}
