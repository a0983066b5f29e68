//! Sibling translation engines for the gdgate gateway
//!
//! Every engine implements [`gdgate::Translator`] and talks to its upstream
//! through the shared [`gdgate::Transport`] seam, so the same proxy settings
//! and test doubles apply to all of them.
//!
//! # Example
//!
//! ```ignore
//! use gdgate::GatewayConfig;
//! use gdgate_engines::{EngineKind, Engines};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::load("config.ini".as_ref())?;
//!     let engines = Engines::from_config(&config)?;
//!
//!     if let Some(entry) = engines.get(EngineKind::DeepL) {
//!         let result = entry.translator.translate("", &entry.target_lang, "Hello").await;
//!         println!("{}", result.data);
//!     }
//!     Ok(())
//! }
//! ```

pub mod google_translate;
pub mod mock;
pub mod openai;
pub mod registry;

// Re-export main types for convenient access
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use openai::OpenAiTranslator;
pub use registry::{EngineEntry, EngineKind, Engines};
