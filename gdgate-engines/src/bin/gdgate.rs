use clap::{Arg, ArgAction, Command};
use gdgate::GatewayConfig;
use gdgate_engines::{EngineKind, Engines};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("gdgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate text through the gdgate engines")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language code (default: the engine's configured target)"),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code (default: auto-detect)")
                .default_value(""),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .short('e')
                .help("Translation engine")
                .value_parser(["deepl", "google", "openai", "mock"])
                .default_value("deepl"),
        )
        .arg(
            Arg::new("keys")
                .long("keys")
                .short('k')
                .help("Comma-separated DeepL API keys used when the free channel is rate limited"),
        )
        .arg(
            Arg::new("proxy")
                .long("proxy")
                .short('p')
                .help("Proxy URL, e.g. socks5://127.0.0.1:1080"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("INI configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full result as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches
        .get_one::<String>("text")
        .ok_or("missing text argument")?;
    let source = matches
        .get_one::<String>("source")
        .map(String::as_str)
        .unwrap_or_default();
    let kind: EngineKind = matches
        .get_one::<String>("engine")
        .map(String::as_str)
        .unwrap_or("deepl")
        .parse()?;

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => GatewayConfig::load(Path::new(path))?,
        None => {
            let mut config = GatewayConfig::default();
            config.apply_overrides(|name| env::var(name).ok())?;
            config
        }
    };

    if let Some(proxy) = matches.get_one::<String>("proxy") {
        config.default.proxy = proxy.clone();
    }

    // Only the requested engine is built
    config.deepl.enable = kind == EngineKind::DeepL;
    config.google.enable = kind == EngineKind::Google;
    config.openai.enable = kind == EngineKind::OpenAi;
    config.youdao.enable = false;

    if let Some(keys) = matches.get_one::<String>("keys") {
        config.deepl.auth_key = keys.clone();
    }
    if config.google.app_secret.is_empty() {
        config.google.app_secret = env::var("GOOGLE_TRANSLATE_API_KEY").unwrap_or_default();
    }
    if config.openai.app_secret.is_empty() {
        config.openai.app_secret = env::var("OPENAI_API_KEY").unwrap_or_default();
    }

    let engines = Engines::from_config(&config)?;
    let entry = engines
        .get(kind)
        .ok_or_else(|| format!("engine {} is not available", kind))?;
    let target = matches
        .get_one::<String>("target")
        .cloned()
        .unwrap_or_else(|| entry.target_lang.clone());

    let source = entry.source_lang(source, text);
    let result = entry.translator.translate(&source, &target, text).await;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_success() {
        println!("{}", result.data);
        for alternative in &result.alternatives {
            println!("  {}", alternative);
        }
    }

    if !result.is_success() {
        eprintln!("❌ {} ({})", result.message, result.code);
        std::process::exit(1);
    }

    Ok(())
}
