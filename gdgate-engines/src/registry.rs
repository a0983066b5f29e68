//! Engine construction from gateway configuration
//!
//! This is the only place credentials leave [`GatewayConfig`]: each enabled
//! engine receives its key through its constructor and keeps it immutable.

use crate::google_translate::GoogleTranslateProvider;
use crate::mock::{MockMode, MockTranslator};
use crate::openai::OpenAiTranslator;
use gdgate::{
    AuthKeyPool, DeepLTranslator, GatewayConfig, ReqwestTransport, TranslateError,
    TranslateResult, Translator, detect_source_lang,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    DeepL,
    Google,
    OpenAi,
    Youdao,
    Mock,
}

impl EngineKind {
    pub const ALL: [EngineKind; 5] = [
        EngineKind::DeepL,
        EngineKind::Google,
        EngineKind::OpenAi,
        EngineKind::Youdao,
        EngineKind::Mock,
    ];

    /// Lowercase name, also used as the route path
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::DeepL => "deepl",
            EngineKind::Google => "google",
            EngineKind::OpenAi => "openai",
            EngineKind::Youdao => "youdao",
            EngineKind::Mock => "mock",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TranslateError::Config(format!("unknown engine: {}", s)))
    }
}

/// An enabled engine and the target language its route uses
#[derive(Clone)]
pub struct EngineEntry {
    pub translator: Arc<dyn Translator>,
    pub target_lang: String,
    /// Detect an empty source language before calling the engine
    pub detect_source: bool,
}

impl EngineEntry {
    /// Source language to send for `text`
    ///
    /// An explicit `requested` code is passed through. An empty one is
    /// detected when the engine needs it, and left empty otherwise so the
    /// upstream detects it.
    pub fn source_lang(&self, requested: &str, text: &str) -> String {
        if requested.is_empty() && self.detect_source {
            detect_source_lang(text)
        } else {
            requested.to_string()
        }
    }
}

impl fmt::Debug for EngineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineEntry")
            .field("provider", &self.translator.provider_name())
            .field("target_lang", &self.target_lang)
            .field("detect_source", &self.detect_source)
            .finish()
    }
}

/// Engines enabled by configuration
#[derive(Debug, Clone, Default)]
pub struct Engines {
    pub deepl: Option<EngineEntry>,
    pub google: Option<EngineEntry>,
    pub openai: Option<EngineEntry>,
    /// Youdao has a route but no implementation
    pub youdao: bool,
}

impl Engines {
    /// Build every enabled engine, sharing one proxied transport
    pub fn from_config(config: &GatewayConfig) -> TranslateResult<Self> {
        let transport = Arc::new(
            ReqwestTransport::new(config.default.proxy_url()).with_timeout(config.default.timeout()),
        );
        let mut engines = Engines {
            youdao: config.youdao.enable,
            ..Engines::default()
        };

        if config.deepl.enable {
            let keys = AuthKeyPool::parse(&config.deepl.auth_key);
            info!(fallback_keys = keys.len(), "deepl: enabled");
            engines.deepl = Some(EngineEntry {
                translator: Arc::new(DeepLTranslator::new(transport.clone(), keys)),
                target_lang: config.deepl.target_lang.clone(),
                detect_source: true,
            });
        }

        if config.google.enable {
            info!("google: enabled");
            let provider =
                GoogleTranslateProvider::new(config.google.app_secret.clone(), transport.clone())?;
            engines.google = Some(EngineEntry {
                translator: Arc::new(provider),
                target_lang: config.google.target_lang.clone(),
                detect_source: false,
            });
        }

        if config.openai.enable {
            info!(model = %config.openai.model, "openai: enabled");
            let translator = OpenAiTranslator::new(
                config.openai.app_secret.clone(),
                config.openai.model.clone(),
                transport,
            )?;
            engines.openai = Some(EngineEntry {
                translator: Arc::new(translator),
                target_lang: config.openai.target_lang.clone(),
                detect_source: false,
            });
        }

        Ok(engines)
    }

    /// Enabled engine for `kind`; the mock engine is always available
    pub fn get(&self, kind: EngineKind) -> Option<EngineEntry> {
        match kind {
            EngineKind::DeepL => self.deepl.clone(),
            EngineKind::Google => self.google.clone(),
            EngineKind::OpenAi => self.openai.clone(),
            EngineKind::Youdao => None,
            EngineKind::Mock => Some(EngineEntry {
                translator: Arc::new(MockTranslator::new(MockMode::Suffix)),
                target_lang: "en".to_string(),
                detect_source: false,
            }),
        }
    }

    pub fn is_enabled(&self, kind: EngineKind) -> bool {
        match kind {
            EngineKind::Youdao => self.youdao,
            EngineKind::Mock => false,
            _ => self.get(kind).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ini: &str) -> GatewayConfig {
        GatewayConfig::from_ini_str(ini).unwrap()
    }

    #[test]
    fn test_engine_kind_parse() {
        assert_eq!("deepl".parse::<EngineKind>().unwrap(), EngineKind::DeepL);
        assert_eq!("OpenAI".parse::<EngineKind>().unwrap(), EngineKind::OpenAi);
        assert!("bing".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_engine_kind_names_round_trip() {
        for kind in EngineKind::ALL {
            assert_eq!(kind.name().parse::<EngineKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_only_enabled_engines_are_built() {
        let engines = Engines::from_config(&config(
            "[deepl]\nenable = true\nauth_key = a,b\n[google]\nenable = false\n",
        ))
        .unwrap();
        assert!(engines.is_enabled(EngineKind::DeepL));
        assert!(!engines.is_enabled(EngineKind::Google));
        assert!(!engines.is_enabled(EngineKind::OpenAi));
        assert!(!engines.is_enabled(EngineKind::Youdao));

        let deepl = engines.get(EngineKind::DeepL).unwrap();
        assert_eq!(deepl.target_lang, "ZH");
        assert_eq!(deepl.translator.provider_name(), "DeepL");
    }

    #[test]
    fn test_enabled_engine_without_secret_fails() {
        let result = Engines::from_config(&config("[google]\nenable = true\n"));
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_all_engines_enabled() {
        let engines = Engines::from_config(&config(
            "[deepl]\nenable = true\n\
             [google]\nenable = true\napp_secret = g\ntarget_lang = ja\n\
             [openai]\nenable = true\napp_secret = sk\n\
             [youdao]\nenable = true\n",
        ))
        .unwrap();
        assert_eq!(engines.get(EngineKind::Google).unwrap().target_lang, "ja");
        assert_eq!(
            engines.get(EngineKind::OpenAi).unwrap().translator.provider_name(),
            "OpenAI"
        );
        assert!(engines.is_enabled(EngineKind::Youdao));
        assert!(engines.get(EngineKind::Youdao).is_none());
    }

    #[test]
    fn test_deepl_entry_detects_empty_source() {
        let engines = Engines::from_config(&config("[deepl]\nenable = true\n")).unwrap();
        let deepl = engines.get(EngineKind::DeepL).unwrap();
        assert!(deepl.detect_source);

        let text = "Guten Morgen, wie geht es Ihnen heute? Ich hoffe, es geht Ihnen gut.";
        assert_eq!(deepl.source_lang("", text), "DE");
        assert_eq!(deepl.source_lang("EN", text), "EN");
    }

    #[test]
    fn test_google_entry_leaves_source_to_upstream() {
        let engines = Engines::from_config(&config(
            "[google]\nenable = true\napp_secret = g\n",
        ))
        .unwrap();
        let google = engines.get(EngineKind::Google).unwrap();
        assert_eq!(google.source_lang("", "Guten Morgen, wie geht es Ihnen heute?"), "");
    }

    #[test]
    fn test_mock_always_available() {
        let engines = Engines::default();
        assert!(engines.get(EngineKind::Mock).is_some());
    }
}
