/// DeepL free-channel emulation
///
/// Reproduces the request shape of the DeepL iOS app against the internal
/// JSON-RPC endpoint and falls back to the authenticated REST API when the
/// free channel is rate limited.
///
/// # Overview
///
/// 1. **timestamp** - text-dependent timestamp the server validates
/// 2. **request** - payload construction and the method-spacing quirk
/// 3. **transport** - HTTP exchange with the mobile header set, proxy support
/// 4. **response** - classification of the JSON-RPC answer
/// 5. **fallback** - rate-limit handling through authenticated keys
///
/// # Example
///
/// ```ignore
/// use gdgate::deepl;
///
/// #[tokio::main]
/// async fn main() {
///     let result = deepl::translate("EN", "pt-BR", "Good morning", "key-1:fx,key-2", "").await;
///     println!("{} ({:?})", result.data, result.method);
/// }
/// ```
pub mod fallback;
pub mod mock;
pub mod official;
pub mod request;
pub mod response;
pub mod timestamp;
pub mod transport;

pub use fallback::{FallbackCoordinator, OFFICIAL_RESULT_ID};
pub use official::{AuthKeyPool, OfficialClient, Usage};
pub use request::{MethodSpacing, TranslationRequest, apply_method_spacing};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

use crate::error::TranslateError;
use crate::translator::{TranslationResult, Translator};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Target used when the caller leaves it empty
pub const DEFAULT_TARGET_LANG: &str = "EN";

/// Free-channel translator with authenticated fallback
///
/// Holds no per-request state; share it behind an `Arc` across requests.
#[derive(Clone)]
pub struct DeepLTranslator {
    transport: Arc<dyn Transport>,
    auth_keys: AuthKeyPool,
}

impl DeepLTranslator {
    pub fn new(transport: Arc<dyn Transport>, auth_keys: AuthKeyPool) -> Self {
        Self {
            transport,
            auth_keys,
        }
    }

    /// Translator using reqwest with an optional proxy
    ///
    /// `auth_key` is a comma-separated list of official API keys; it may be
    /// empty, in which case rate limiting is reported as-is.
    pub fn direct(auth_key: &str, proxy_url: Option<&str>) -> Self {
        Self::new(
            Arc::new(ReqwestTransport::new(proxy_url)),
            AuthKeyPool::parse(auth_key),
        )
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn translate_text(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult {
        if text.is_empty() {
            return TranslateError::EmptyInput.into();
        }
        let target_lang = if target_lang.is_empty() {
            DEFAULT_TARGET_LANG
        } else {
            target_lang
        };

        let request = TranslationRequest::new(source_lang, target_lang, text);
        debug!(id = request.id, timestamp = request.timestamp, "built free-channel request");

        FallbackCoordinator::new(self.transport.as_ref(), &self.auth_keys)
            .run(&request)
            .await
    }
}

impl std::fmt::Debug for DeepLTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLTranslator")
            .field("auth_keys", &self.auth_keys)
            .finish()
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult {
        self.translate_text(source_lang, target_lang, text).await
    }

    fn provider_name(&self) -> &str {
        "DeepL"
    }
}

/// One-shot translation through the free channel
///
/// `auth_key` may be a comma-separated list whose order is the fallback
/// priority; an empty `proxy_url` means a direct connection.
pub async fn translate(
    source_lang: &str,
    target_lang: &str,
    text: &str,
    auth_key: &str,
    proxy_url: &str,
) -> TranslationResult {
    DeepLTranslator::direct(auth_key, Some(proxy_url))
        .translate_text(source_lang, target_lang, text)
        .await
}
