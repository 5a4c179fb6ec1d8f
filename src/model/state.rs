use serde::{Deserialize, Serialize};

use crate::model::language::{LanguageOptions, LanguagePair};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    #[default]
    Editing,
    Checking,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub api_key: String,
    pub key_status: KeyStatus,
    pub key_notice: Option<String>,

    pub active_languages: LanguagePair,
    pub language_options: LanguageOptions,

    pub query: String,
    pub stable_query: String,

    pub translation: String,
    pub detected_source_language: Option<String>,
    pub in_flight: usize,
}

impl AppState {
    pub fn is_form_enabled(&self) -> bool {
        self.key_status == KeyStatus::Valid
    }

    pub fn view(&self) -> StateView {
        StateView {
            api_key_preview: key_preview(&self.api_key),
            key_status: self.key_status,
            key_notice: self.key_notice.clone(),
            active_languages: self.active_languages.clone(),
            language_options: self.language_options.clone(),
            query: self.query.clone(),
            translation: self.translation.clone(),
            detected_source_language: self.detected_source_language.clone(),
            is_request_pending: self.in_flight > 0,
            disabled: !self.is_form_enabled(),
        }
    }
}

/// What the host gets to see. Never carries the full API key.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StateView {
    pub api_key_preview: Option<String>,
    pub key_status: KeyStatus,
    pub key_notice: Option<String>,
    pub active_languages: LanguagePair,
    pub language_options: LanguageOptions,
    pub query: String,
    pub translation: String,
    pub detected_source_language: Option<String>,
    pub is_request_pending: bool,
    pub disabled: bool,
}

fn key_preview(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    let head: String = key.chars().take(3).collect();
    Some(format!("{head}..."))
}
