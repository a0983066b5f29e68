//! Gateway configuration
//!
//! Loaded from an INI file with one section per engine:
//!
//! ```ini
//! [default]
//! port = 8080
//! proxy = socks5://127.0.0.1:1080
//!
//! [deepl]
//! enable = true
//! auth_key = key-one:fx,key-two
//! target_lang = ZH
//!
//! [google]
//! enable = false
//! app_secret = ...
//!
//! [openai]
//! enable = false
//! app_secret = sk-...
//!
//! [youdao]
//! enable = false
//! ```
//!
//! Proxy environment variables (`all_proxy`, then `https_proxy`, then
//! `http_proxy`) replace the configured proxy, and `PORT` replaces the port.
//! Credentials are read once here and handed to engine constructors.

use crate::error::ConfigError;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_deepl_target() -> String {
    "ZH".to_string()
}

fn default_engine_target() -> String {
    "zh-CN".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upstream proxy for every engine; empty means direct
    #[serde(default)]
    pub proxy: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            proxy: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn proxy_url(&self) -> Option<&str> {
        Some(self.proxy.trim()).filter(|p| !p.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeepLConfig {
    #[serde(default)]
    pub enable: bool,
    /// Comma-separated official API keys, tried in order on rate limiting
    #[serde(default)]
    pub auth_key: String,
    #[serde(default = "default_deepl_target")]
    pub target_lang: String,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            enable: false,
            auth_key: String::new(),
            target_lang: default_deepl_target(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub app_secret: String,
    #[serde(default = "default_engine_target")]
    pub target_lang: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            enable: false,
            app_secret: String::new(),
            target_lang: default_engine_target(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub app_secret: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_engine_target")]
    pub target_lang: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            enable: false,
            app_secret: String::new(),
            model: default_openai_model(),
            target_lang: default_engine_target(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct YoudaoConfig {
    #[serde(default)]
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub default: ServerConfig,
    #[serde(default)]
    pub deepl: DeepLConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub youdao: YoudaoConfig,
}

impl GatewayConfig {
    /// Load `path` and apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .build()?;
        let mut config: GatewayConfig = settings.try_deserialize()?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse INI text without touching the environment
    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Ini))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Apply proxy and port overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy) = proxy_from_env(&lookup) {
            self.default.proxy = proxy;
        }

        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            self.default.port = port.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "PORT".to_string(),
                reason: format!("{}", e),
            })?;
        }
        Ok(())
    }
}

/// `all_proxy` wins over `https_proxy`, which wins over `http_proxy`
fn proxy_from_env<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["all_proxy", "https_proxy", "http_proxy"]
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}
