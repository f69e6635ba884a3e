pub mod error;
pub mod events;
pub mod settings;
pub mod types;

#[cfg(test)]
mod bindings {
    use ts_rs::TS;

    use super::events::AppEvent;
    use super::settings::{AppSettings, VoiceProfile};
    use super::types::{
        ManualTranslatePayload, ProcessingPayload, TranslationMode, TranslationRequest,
        TranslationResult,
    };

    /// Triggers ts-rs to write the TypeScript bindings consumed by the
    /// renderer. Run with: cargo test export_bindings
    #[test]
    fn export_bindings() {
        TranslationMode::export().expect("Failed to export TranslationMode");
        TranslationRequest::export().expect("Failed to export TranslationRequest");
        TranslationResult::export().expect("Failed to export TranslationResult");
        ProcessingPayload::export().expect("Failed to export ProcessingPayload");
        ManualTranslatePayload::export().expect("Failed to export ManualTranslatePayload");
        AppSettings::export().expect("Failed to export AppSettings");
        VoiceProfile::export().expect("Failed to export VoiceProfile");
        AppEvent::export().expect("Failed to export AppEvent");
    }
}
