//! Error types shared by every translation engine.
//!
//! Failures never abort the gateway: they are folded into a
//! [`TranslationResult`](crate::TranslationResult) carrying an HTTP-style
//! status code and a human-readable message.

use thiserror::Error;

/// Why a translation did not produce text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// No text was supplied.
    #[error("No text to translate")]
    EmptyInput,

    /// DNS, connect, proxy or unexpected HTTP status failure.
    #[error("DeepL API request failed")]
    Transport(String),

    /// The free channel answered with the invalid-request sentinel.
    #[error("Invalid target language")]
    ProtocolRejected,

    /// The server accepted the request but returned nothing usable.
    #[error("Translation failed, API returns an empty result.")]
    EmptyResult,

    /// The free channel is rate limited and no authenticated key could take over.
    #[error("Too many requests")]
    QuotaExceeded,

    /// A sibling engine (Google, OpenAI, ...) failed.
    #[error("Translation provider error: {0}")]
    Provider(String),

    /// An engine could not be constructed from its configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranslateError {
    /// HTTP-style status the routing layer reports for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            TranslateError::EmptyInput => 404,
            TranslateError::Transport(_) => 503,
            TranslateError::ProtocolRejected => 406,
            TranslateError::EmptyResult => 503,
            TranslateError::QuotaExceeded => 429,
            TranslateError::Provider(_) => 502,
            TranslateError::Config(_) => 500,
        }
    }
}

/// Failure of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The proxy URL could not be parsed or applied.
    #[error("invalid proxy URL {url}: {reason}")]
    Proxy { url: String, reason: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Connect(String),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16, body: Vec<u8> },
}

impl TransportError {
    pub fn is_too_many_requests(&self) -> bool {
        matches!(self, TransportError::Status { status: 429, .. })
    }
}

impl From<TransportError> for TranslateError {
    fn from(err: TransportError) -> Self {
        TranslateError::Transport(err.to_string())
    }
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Result type for engine operations
pub type TranslateResult<T> = Result<T, TranslateError>;
