use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use gdgate::TranslationResult;
use gdgate_engines::{EngineEntry, Engines};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const GOLDENDICT_TEMPLATE: &str = include_str!("static/goldendict.html");

/// GoldenDict passes the selected word as `gdword`
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub gdword: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslatePayload {
    pub text: String,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engines: Arc<Engines>,
}

/// Build the gateway router; disabled engines get no route
pub fn router(engines: Engines) -> Router {
    let mut app = Router::new();

    if engines.deepl.is_some() {
        app = app
            .route("/deepl", get(deepl_lookup))
            .route("/translate", post(translate_json));
    }
    if engines.google.is_some() {
        app = app.route("/google", get(google_lookup));
    }
    if engines.openai.is_some() {
        app = app.route("/openai", get(openai_lookup));
    }
    if engines.youdao {
        app = app.route("/youdao", get(youdao_lookup));
    }

    let state = AppState {
        engines: Arc::new(engines),
    };

    app.fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn deepl_lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    match state.engines.deepl.as_ref() {
        Some(entry) => lookup(entry, &query.gdword).await,
        None => not_found().await.into_response(),
    }
}

async fn google_lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let Some(entry) = state.engines.google.as_ref() else {
        return not_found().await.into_response();
    };
    let result = translate_entry(entry, &query.gdword).await;
    if result.is_success() {
        render_page(&result.data).into_response()
    } else {
        (StatusCode::NOT_FOUND, "No Translation").into_response()
    }
}

async fn openai_lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    match state.engines.openai.as_ref() {
        Some(entry) => lookup(entry, &query.gdword).await,
        None => not_found().await.into_response(),
    }
}

async fn youdao_lookup() -> Html<String> {
    render_page("Not implemented")
}

async fn translate_json(
    State(state): State<AppState>,
    Json(payload): Json<TranslatePayload>,
) -> Response {
    let Some(entry) = state.engines.deepl.as_ref() else {
        return not_found().await.into_response();
    };

    let source_lang = entry.source_lang(&payload.source_lang, &payload.text);
    info!(
        source = %source_lang,
        target = %payload.target_lang,
        chars = payload.text.chars().count(),
        "translate request"
    );
    let result = entry
        .translator
        .translate(&source_lang, &payload.target_lang, &payload.text)
        .await;

    (status_of(&result), Json(result)).into_response()
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: StatusCode::NOT_FOUND.as_u16(),
            message: "Path not found".to_string(),
        }),
    )
}

async fn translate_entry(entry: &EngineEntry, word: &str) -> TranslationResult {
    let source_lang = entry.source_lang("", word);
    let result = entry
        .translator
        .translate(&source_lang, &entry.target_lang, word)
        .await;
    if !result.is_success() {
        warn!(
            provider = entry.translator.provider_name(),
            code = result.code,
            message = %result.message,
            "lookup failed"
        );
    }
    result
}

/// Render a GoldenDict page on success, plain text with the result code otherwise
async fn lookup(entry: &EngineEntry, word: &str) -> Response {
    let result = translate_entry(entry, word).await;
    if result.is_success() {
        render_page(&result.data).into_response()
    } else {
        (
            status_of(&result),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            result.message,
        )
            .into_response()
    }
}

fn status_of(result: &TranslationResult) -> StatusCode {
    StatusCode::from_u16(result.code).unwrap_or(StatusCode::BAD_GATEWAY)
}

pub fn render_page(text: &str) -> Html<String> {
    Html(GOLDENDICT_TEMPLATE.replace("{{Text}}", &escape_html(text)))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
