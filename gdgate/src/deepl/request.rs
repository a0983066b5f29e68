//! Free-channel payload construction
//!
//! The payload is serialized structurally first, then the `"method"` key
//! separator is respaced to match the mobile client's serializer. The
//! respacing lives in [`apply_method_spacing`] so it can be tested and swapped
//! on its own.

use crate::deepl::timestamp;
use crate::translator::split_language;
use rand::Rng;
use serde::Serialize;

pub const JSONRPC_VERSION: &str = "2.0";
pub const METHOD_HANDLE_TEXTS: &str = "LMT_handle_texts";
pub const REQUEST_ALTERNATIVES: u32 = 3;
pub const SPLITTING_NEWLINES: &str = "newlines";

#[derive(Debug, Serialize)]
struct PostData<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    id: i64,
    params: Params<'a>,
}

#[derive(Debug, Serialize)]
struct Params<'a> {
    texts: Vec<Text<'a>>,
    splitting: &'static str,
    lang: Lang<'a>,
    timestamp: i64,
    #[serde(rename = "commonJobParams")]
    common_job_params: CommonJobParams<'a>,
}

#[derive(Debug, Serialize)]
struct Text<'a> {
    text: &'a str,
    #[serde(rename = "requestAlternatives")]
    request_alternatives: u32,
}

#[derive(Debug, Serialize)]
struct Lang<'a> {
    source_lang_user_selected: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Serialize)]
struct CommonJobParams<'a> {
    #[serde(rename = "wasSpoken")]
    was_spoken: bool,
    transcribe_as: &'static str,
    #[serde(rename = "regionalVariant", skip_serializing_if = "Option::is_none")]
    regional_variant: Option<&'a str>,
}

/// One free-channel query, ready to be serialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub id: i64,
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
    pub timestamp: i64,
}

impl TranslationRequest {
    /// Build a request with a fresh id and a timestamp derived from `text`
    pub fn new(source_lang: &str, target_lang: &str, text: &str) -> Self {
        Self::with_id(next_request_id(), source_lang, target_lang, text)
    }

    pub fn with_id(id: i64, source_lang: &str, target_lang: &str, text: &str) -> Self {
        Self {
            id,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            text: text.to_string(),
            timestamp: timestamp::timestamp(text),
        }
    }

    /// Serialized payload including the method-spacing quirk
    pub fn to_bytes(&self) -> Vec<u8> {
        let (target_base, regional_variant) = split_language(&self.target_lang);
        let post_data = PostData {
            jsonrpc: JSONRPC_VERSION,
            method: METHOD_HANDLE_TEXTS,
            id: self.id,
            params: Params {
                texts: vec![Text {
                    text: &self.text,
                    request_alternatives: REQUEST_ALTERNATIVES,
                }],
                splitting: SPLITTING_NEWLINES,
                lang: Lang {
                    source_lang_user_selected: &self.source_lang,
                    target_lang: target_base,
                },
                timestamp: self.timestamp,
                common_job_params: CommonJobParams {
                    was_spoken: false,
                    transcribe_as: "",
                    regional_variant,
                },
            },
        };

        // Only borrowed strings, bools and integers: serialization cannot fail
        let json = serde_json::to_string(&post_data).unwrap_or_default();
        apply_method_spacing(&json, self.id).into_bytes()
    }
}

/// Random seed in the range the mobile client uses, plus one
///
/// The increment happens here so the spacing check always sees the id that
/// goes on the wire.
pub fn next_request_id() -> i64 {
    let seed = (rand::thread_rng().gen_range(0..99_999) + 8_300_000) * 1000;
    seed + 1
}

/// Separator the mobile client writes between `"method"` and its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSpacing {
    /// `"method" : "`
    Both,
    /// `"method": "`
    After,
}

impl MethodSpacing {
    pub fn for_id(id: i64) -> Self {
        if (id + 5) % 29 == 0 || (id + 3) % 13 == 0 {
            MethodSpacing::Both
        } else {
            MethodSpacing::After
        }
    }

    fn separator(self) -> &'static str {
        match self {
            MethodSpacing::Both => "\"method\" : \"",
            MethodSpacing::After => "\"method\": \"",
        }
    }
}

/// Respace the `"method"` separator of an already serialized payload
pub fn apply_method_spacing(json: &str, id: i64) -> String {
    json.replace("\"method\":\"", MethodSpacing::for_id(id).separator())
}
