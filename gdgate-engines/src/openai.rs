//! OpenAI chat-completion translator
//!
//! Sends a fixed system prompt describing a technical translation engine and
//! returns the first choice's message content verbatim.

use async_trait::async_trait;
use gdgate::deepl::transport::{HttpRequest, Transport};
use gdgate::{Method, TranslateError, TranslateResult, TranslationResult, Translator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub fn system_prompt(target_lang: &str) -> String {
    format!(
        "You are a highly skilled translation engine with expertise in the technology sector. \
         Your function is to translate texts accurately into the target {}, maintaining the \
         original format, technical terms, and abbreviations. Do not add any explanations or \
         annotations to the translated text.",
        target_lang
    )
}

pub fn user_prompt(target_lang: &str, text: &str) -> String {
    format!(
        "Translate the following source text to {}, Output translation directly without any \
         additional text.\nSource Text: {},\nTranslated Text:",
        target_lang, text
    )
}

#[derive(Clone)]
pub struct OpenAiTranslator {
    api_key: String,
    model: String,
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl OpenAiTranslator {
    pub fn new(
        api_key: String,
        model: String,
        transport: Arc<dyn Transport>,
    ) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config("API key cannot be empty".to_string()));
        }
        Ok(Self {
            api_key,
            model,
            transport,
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    async fn complete(&self, target_lang: &str, text: &str) -> TranslateResult<String> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(target_lang),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(target_lang, text),
                },
            ],
        };
        let body = serde_json::to_vec(&request_body)
            .map_err(|e| TranslateError::Provider(format!("OpenAI Error: {}", e)))?;

        let request = HttpRequest::post(self.endpoint.as_str(), body)
            .with_header("Authorization", format!("Bearer {}", self.api_key))
            .with_header("Content-Type", "application/json");

        debug!(model = %self.model, "sending chat completion");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| TranslateError::Provider(format!("OpenAI Error: {}", e)))?;

        let parsed: ChatResponse = serde_json::from_slice(&response.body)
            .map_err(|e| TranslateError::Provider(format!("OpenAI Error: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TranslateError::Provider("OpenAI Error: no choices returned".into()))
    }
}

impl std::fmt::Debug for OpenAiTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTranslator")
            .field("api_key", &"***")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(
        &self,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> TranslationResult {
        if text.is_empty() {
            return TranslateError::EmptyInput.into();
        }

        match self.complete(target_lang, text).await {
            Ok(content) if content.trim().is_empty() => TranslateError::EmptyResult.into(),
            Ok(content) => TranslationResult::success(
                0,
                content.trim().to_string(),
                Vec::new(),
                source_lang,
                target_lang,
                Method::OpenAi,
            ),
            Err(e) => {
                warn!(error = %e, "OpenAI translation failed");
                e.into()
            }
        }
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdgate::deepl::mock::MockTransport;
    use serde_json::{Value, json};

    fn translator(transport: &Arc<MockTransport>) -> OpenAiTranslator {
        OpenAiTranslator::new("sk-test".into(), "gpt-4o-mini".into(), transport.clone()).unwrap()
    }

    #[test]
    fn test_prompts_mention_target() {
        assert!(system_prompt("zh-CN").contains("target zh-CN"));
        let prompt = user_prompt("zh-CN", "kernel panic");
        assert!(prompt.contains("to zh-CN"));
        assert!(prompt.contains("Source Text: kernel panic,"));
        assert!(prompt.ends_with("Translated Text:"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::new());
        let result = OpenAiTranslator::new(" ".into(), "gpt-4o-mini".into(), transport);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[tokio::test]
    async fn test_translate_success() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "内核恐慌\n"}}]
        }));

        let result = translator(&transport).translate("", "zh-CN", "kernel panic").await;
        assert!(result.is_success());
        assert_eq!(result.data, "内核恐慌");
        assert_eq!(result.method, Some(Method::OpenAi));

        let requests = transport.requests();
        assert_eq!(requests[0].url, CHAT_COMPLETIONS_URL);
        assert_eq!(requests[0].header("Authorization"), Some("Bearer sk-test"));
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[tokio::test]
    async fn test_translate_no_choices() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"choices": []}));
        let result = translator(&transport).translate("", "de", "hello").await;
        assert_eq!(result.code, 502);
        assert!(result.message.contains("no choices"));
    }

    #[tokio::test]
    async fn test_translate_http_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(401);
        let result = translator(&transport).translate("", "de", "hello").await;
        assert_eq!(result.code, 502);
        assert!(result.message.contains("OpenAI Error"));
    }

    #[tokio::test]
    async fn test_translate_empty_text() {
        let transport = Arc::new(MockTransport::new());
        let result = translator(&transport).translate("", "de", "").await;
        assert_eq!(result.code, 404);
        assert_eq!(transport.call_count(), 0);
    }
}
