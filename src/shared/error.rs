//! Application error taxonomy.
//!
//! All variants are serializable so command failures cross the IPC
//! boundary as structured values instead of bare strings.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// Input text was empty after trimming.
    #[error("Nothing to translate: the input text is empty")]
    EmptyInput,

    /// No API credential could be resolved from the environment or keychain.
    #[error("No API key configured. Set OPENAI_API_KEY or store a key in the system keychain")]
    MissingCredential,

    /// The API answered, but without any message content.
    #[error("The translation service returned no content")]
    EmptyResponse,

    /// The API content was not the JSON object we asked for.
    #[error("Could not understand the translation response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<tauri::Error> for AppError {
    fn from(err: tauri::Error) -> Self {
        AppError::Window(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_with_kind_tag() {
        let value = serde_json::to_value(AppError::EmptyInput).unwrap();
        assert_eq!(value["kind"], "EmptyInput");

        let value = serde_json::to_value(AppError::Network("timed out".into())).unwrap();
        assert_eq!(value["kind"], "Network");
        assert_eq!(value["message"], "timed out");
    }

    #[test]
    fn messages_are_user_facing() {
        assert!(AppError::EmptyInput.to_string().contains("empty"));
        assert!(AppError::MissingCredential.to_string().contains("OPENAI_API_KEY"));
    }
}
