use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::error::{AppError, AppResult};
use super::settings::AppSettings;

/// Translation mode selected by the user.
///
/// `Meaning` asks for the translation only; `Detailed` additionally asks
/// for grammar and vocabulary notes embedded in the translated text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "ui/bindings/")]
pub enum TranslationMode {
    #[default]
    Meaning,
    Detailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "ui/bindings/")]
pub struct TranslationRequest {
    pub text: String,
    pub model: String,
    pub target_language: String,
    pub mode: TranslationMode,
}

impl TranslationRequest {
    /// Build a request from raw input text. The text is trimmed; an empty
    /// result is rejected before any network activity can happen.
    pub fn new(
        text: impl AsRef<str>,
        model: impl Into<String>,
        target_language: impl Into<String>,
        mode: TranslationMode,
    ) -> AppResult<Self> {
        let text = text.as_ref().trim().to_string();
        if text.is_empty() {
            return Err(AppError::EmptyInput);
        }
        Ok(Self {
            text,
            model: model.into(),
            target_language: target_language.into(),
            mode,
        })
    }

    pub fn from_settings(text: impl AsRef<str>, settings: &AppSettings) -> AppResult<Self> {
        Self::new(
            text,
            settings.model.clone(),
            settings.target_language.clone(),
            settings.translation_mode,
        )
    }
}

/// Immutable outcome of a successful translation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "ui/bindings/")]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub detected_language: Option<String>,
    pub target_language: String,
    pub model: String,
}

/// Payload pushed to the renderer when a translation starts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "ui/bindings/")]
pub struct ProcessingPayload {
    pub text: String,
    pub model: String,
    pub target_language: String,
    pub translation_mode: TranslationMode,
}

impl From<&TranslationRequest> for ProcessingPayload {
    fn from(request: &TranslationRequest) -> Self {
        Self {
            text: request.text.clone(),
            model: request.model.clone(),
            target_language: request.target_language.clone(),
            translation_mode: request.mode,
        }
    }
}

/// Request issued by the renderer's translate button. Missing fields fall
/// back to the persisted preferences.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "ui/bindings/")]
pub struct ManualTranslatePayload {
    pub text: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub translation_mode: Option<TranslationMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_trims_input() {
        let request =
            TranslationRequest::new("  Hello \n", "gpt-4.1-nano", "Vietnamese", TranslationMode::Meaning)
                .unwrap();
        assert_eq!(request.text, "Hello");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = TranslationRequest::new("", "gpt-4.1-nano", "Vietnamese", TranslationMode::Meaning)
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyInput));
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        let err =
            TranslationRequest::new(" \t\n ", "gpt-4.1-nano", "Vietnamese", TranslationMode::Meaning)
                .unwrap_err();
        assert!(matches!(err, AppError::EmptyInput));
    }

    #[test]
    fn from_settings_carries_preferences() {
        let settings = AppSettings::default();
        let request = TranslationRequest::from_settings("Hello", &settings).unwrap();
        assert_eq!(request.model, settings.model);
        assert_eq!(request.target_language, settings.target_language);
        assert_eq!(request.mode, settings.translation_mode);
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TranslationMode::Detailed).unwrap(),
            "\"detailed\""
        );
        assert_eq!(
            serde_json::from_str::<TranslationMode>("\"meaning\"").unwrap(),
            TranslationMode::Meaning
        );
    }

    #[test]
    fn manual_payload_tolerates_missing_fields() {
        let payload: ManualTranslatePayload =
            serde_json::from_str(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(payload.text, "Hello");
        assert!(payload.model.is_none());
        assert!(payload.translation_mode.is_none());
    }
}
