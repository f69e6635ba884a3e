//! Translation client for OpenAI-compatible chat-completions APIs.
//!
//! The model is asked for a strictly-typed JSON object so the reply can
//! be parsed without scraping prose. Language detection happens on the
//! remote side; the prompt carries the fallback policy for inputs that
//! already match the target language.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{TranslationMode, TranslationRequest, TranslationResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

const KEYRING_SERVICE: &str = "tray-translate";
const KEYRING_ACCOUNT: &str = "openai_api_key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MEANING_TEMPERATURE: f32 = 0.2;
const DETAILED_TEMPERATURE: f32 = 0.3;
const MEANING_MAX_TOKENS: u32 = 500;
const DETAILED_MAX_TOKENS: u32 = 2000;

/// Seam between the orchestration flow and the remote model, so the
/// flow can be exercised against a fake backend in tests.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResult>;
}

pub struct OpenAiTranslator {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiTranslator {
    pub fn new() -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("tray-translate")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;
        let base_url = std::env::var(BASE_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { http, base_url })
    }

    fn api_key(&self) -> AppResult<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
            .map_err(|e| AppError::Settings(e.to_string()))?;
        match entry.get_password() {
            Ok(key) => Ok(key),
            Err(keyring::Error::NoEntry) => Err(AppError::MissingCredential),
            Err(err) => Err(AppError::Settings(err.to_string())),
        }
    }
}

#[async_trait]
impl TranslationBackend for OpenAiTranslator {
    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResult> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyInput);
        }
        let api_key = self.api_key()?;

        let system = system_prompt(request.mode);
        let user = user_prompt(request);
        let (temperature, max_tokens) = sampling(request.mode);
        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            response_format: response_format(),
            temperature,
            max_tokens,
        };

        debug!(target: "translator", model = %request.model, mode = ?request.mode, "dispatching translation");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!(
                "translation API error ({status}): {detail}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("invalid API response: {e}")))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(AppError::EmptyResponse)?;

        parse_result(&content, text, request)
    }
}

fn sampling(mode: TranslationMode) -> (f32, u32) {
    match mode {
        TranslationMode::Meaning => (MEANING_TEMPERATURE, MEANING_MAX_TOKENS),
        TranslationMode::Detailed => (DETAILED_TEMPERATURE, DETAILED_MAX_TOKENS),
    }
}

fn system_prompt(mode: TranslationMode) -> String {
    let mut prompt = String::from(
        "You are a precise translation engine. Detect the input language \
         automatically and translate into the preferred target language. \
         If the detected language already matches the target, translate \
         into the most common alternate language for Vietnamese users instead.",
    );

    match mode {
        TranslationMode::Meaning => {
            prompt.push_str(
                " Translate the meaning accurately and naturally, with no extra commentary.",
            );
        }
        TranslationMode::Detailed => {
            prompt.push_str(
                " In detailed mode you MUST provide a full explanation. \
                 Lay out the translatedText field as:\n\n\
                 [Translation]\n\n\
                 [Grammar]\n- Sentence structure: ...\n- Grammar points: ...\n\n\
                 [Key phrases]\n- phrase: explanation\n\n\
                 [Usage notes]\n- ...",
            );
        }
    }

    prompt.push_str(
        " Respond as JSON in the shape: \
         {\"detectedLanguage\": \"...\", \"targetLanguage\": \"...\", \"translatedText\": \"...\"}",
    );
    prompt
}

fn user_prompt(request: &TranslationRequest) -> String {
    let mut prompt = format!(
        "Preferred target language: {}\nText: \"\"\"{}\"\"\"",
        request.target_language,
        request.text.trim()
    );

    if request.mode == TranslationMode::Detailed {
        prompt.push_str(
            "\n\nIMPORTANT: translate and explain in full:\n\
             1. The exact translation\n\
             2. Grammar and sentence structure\n\
             3. Key phrases and vocabulary\n\
             4. Usage and context notes\n\n\
             The translatedText field must contain ALL of the sections above in a clear layout.",
        );
    }

    prompt
}

/// JSON schema constraining the model's reply to exactly the three
/// fields the renderer consumes.
fn response_format() -> serde_json::Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "translation_result",
            "schema": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "detectedLanguage": { "type": "string" },
                    "targetLanguage": { "type": "string" },
                    "translatedText": { "type": "string" }
                },
                "required": ["detectedLanguage", "targetLanguage", "translatedText"]
            }
        }
    })
}

fn parse_result(
    content: &str,
    text: &str,
    request: &TranslationRequest,
) -> AppResult<TranslationResult> {
    let fields: SchemaFields = serde_json::from_str(content)
        .map_err(|e| AppError::MalformedResponse(e.to_string()))?;
    let translated_text = fields
        .translated_text
        .filter(|translated| !translated.trim().is_empty())
        .ok_or_else(|| AppError::MalformedResponse("translatedText is missing".to_string()))?;

    Ok(TranslationResult {
        original_text: text.to_string(),
        translated_text,
        detected_language: fields.detected_language,
        target_language: fields
            .target_language
            .unwrap_or_else(|| request.target_language.clone()),
        model: request.model.clone(),
    })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: serde_json::Value,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaFields {
    detected_language: Option<String>,
    target_language: Option<String>,
    translated_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: TranslationMode) -> TranslationRequest {
        TranslationRequest::new("Hello", "gpt-4.1-nano", "Vietnamese", mode).unwrap()
    }

    #[test]
    fn detailed_mode_raises_the_token_ceiling() {
        let (meaning_temp, meaning_tokens) = sampling(TranslationMode::Meaning);
        let (detailed_temp, detailed_tokens) = sampling(TranslationMode::Detailed);
        assert_eq!(meaning_tokens, 500);
        assert_eq!(detailed_tokens, 2000);
        assert!(detailed_tokens > meaning_tokens);
        assert!(detailed_temp > meaning_temp);
    }

    #[test]
    fn response_format_requires_exactly_three_string_fields() {
        let format = response_format();
        assert_eq!(format["type"], "json_schema");
        let schema = &format["json_schema"]["schema"];
        assert_eq!(schema["additionalProperties"], false);

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["detectedLanguage", "targetLanguage", "translatedText"]
        );
        assert_eq!(schema["properties"].as_object().unwrap().len(), 3);
        for field in required {
            assert_eq!(schema["properties"][field]["type"], "string");
        }
    }

    #[test]
    fn prompts_differ_by_mode() {
        let meaning = system_prompt(TranslationMode::Meaning);
        let detailed = system_prompt(TranslationMode::Detailed);
        assert!(!meaning.contains("[Grammar]"));
        assert!(detailed.contains("[Grammar]"));
        assert!(detailed.contains("[Usage notes]"));

        let meaning_user = user_prompt(&request(TranslationMode::Meaning));
        let detailed_user = user_prompt(&request(TranslationMode::Detailed));
        assert!(meaning_user.contains("\"\"\"Hello\"\"\""));
        assert!(!meaning_user.contains("IMPORTANT"));
        assert!(detailed_user.contains("IMPORTANT"));
    }

    #[test]
    fn prompt_carries_the_same_target_fallback_policy() {
        let prompt = system_prompt(TranslationMode::Meaning);
        assert!(prompt.contains("most common alternate language for Vietnamese users"));
    }

    #[test]
    fn parse_accepts_the_schema_shape() {
        let content = r#"{
            "detectedLanguage": "English",
            "targetLanguage": "Vietnamese",
            "translatedText": "Xin chào"
        }"#;
        let result = parse_result(content, "Hello", &request(TranslationMode::Meaning)).unwrap();
        assert_eq!(result.original_text, "Hello");
        assert_eq!(result.translated_text, "Xin chào");
        assert_eq!(result.detected_language.as_deref(), Some("English"));
        assert_eq!(result.target_language, "Vietnamese");
        assert_eq!(result.model, "gpt-4.1-nano");
    }

    #[test]
    fn non_json_content_is_malformed() {
        let err = parse_result("xin chào", "Hello", &request(TranslationMode::Meaning)).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn missing_translated_text_is_malformed() {
        let err = parse_result(
            r#"{"detectedLanguage": "English"}"#,
            "Hello",
            &request(TranslationMode::Meaning),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));

        let err = parse_result(
            r#"{"translatedText": "   "}"#,
            "Hello",
            &request(TranslationMode::Meaning),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn missing_target_falls_back_to_the_requested_one() {
        let result = parse_result(
            r#"{"translatedText": "Xin chào"}"#,
            "Hello",
            &request(TranslationMode::Meaning),
        )
        .unwrap();
        assert_eq!(result.target_language, "Vietnamese");
        assert!(result.detected_language.is_none());
    }

    #[tokio::test]
    async fn empty_text_short_circuits_before_any_network_call() {
        let translator = OpenAiTranslator::new().unwrap();
        // Bypass the request constructor to prove the client guards too.
        let request = TranslationRequest {
            text: "   ".to_string(),
            model: "gpt-4.1-nano".to_string(),
            target_language: "Vietnamese".to_string(),
            mode: TranslationMode::Meaning,
        };
        let err = translator.translate(&request).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyInput));
    }
}
