//! Translation gateway core
//!
//! Provides the [`Translator`] abstraction shared by every engine, the DeepL
//! free-channel emulation with authenticated fallback ([`deepl`]), source
//! language detection ([`detect`]) and the gateway configuration ([`config`]).

pub mod config;
pub mod deepl;
pub mod detect;
pub mod error;
pub mod translator;

// Re-export main types for convenient access
pub use config::GatewayConfig;
pub use deepl::{AuthKeyPool, DeepLTranslator, ReqwestTransport, Transport};
pub use detect::detect_source_lang;
pub use error::{ConfigError, TranslateError, TranslateResult, TransportError};
pub use translator::{Method, TranslationResult, Translator, split_language};
