//! The client state machine.
//!
//! Every user action and every fetch result arrives as a [`Msg`]. `App::update`
//! applies it to the state and hands back the side effects it wants performed;
//! the [`runtime`] executes them and feeds their results back in as messages.

pub mod runtime;

use tracing::{debug, info};

use crate::error::{ApiError, CoreError, CoreResult};
use crate::model::language::{Language, LanguageKind, LanguageOptions, LanguagePair, Translation};
use crate::model::state::{AppState, KeyStatus};
use crate::services::fingerprint::key_fingerprint;
use crate::services::normalize;

pub const API_KEY_LEN: usize = 36;
pub const NOTICE_KEY_LENGTH: &str = "Needs to be 36 characters";
pub const NOTICE_KEY_REJECTED: &str = "Invalid API key";
pub const TRANSLATION_FALLBACK: &str = "Could not translate";

#[derive(Debug)]
pub enum Msg {
    ApiKeyChanged(String),
    ApiKeySubmitted,
    ApiKeyEdit,
    ApiKeyForget,
    LanguagesLoaded {
        api_key: String,
        result: Result<LanguageOptions, ApiError>,
    },
    LanguagesChanged {
        source: String,
        target: String,
    },
    ReverseDirection,
    QueryChanged(String),
    QueryStabilized(String),
    TranslationResolved(Result<Translation, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchLanguages {
        api_key: String,
    },
    Debounce(String),
    Translate {
        api_key: String,
        text: String,
        languages: LanguagePair,
    },
    PersistApiKey(String),
    ForgetApiKey,
}

pub fn is_valid_api_key(api_key: &str) -> bool {
    api_key.chars().count() == API_KEY_LEN
}

#[derive(Debug, Default)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new() -> Self {
        App::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn update(&mut self, msg: Msg) -> CoreResult<Vec<Effect>> {
        let s = &mut self.state;

        match msg {
            Msg::ApiKeyChanged(key) => {
                s.api_key = key.trim().to_string();
                s.key_status = KeyStatus::Editing;
                s.key_notice = None;
                Ok(vec![])
            }

            Msg::ApiKeySubmitted => {
                if !is_valid_api_key(&s.api_key) {
                    s.key_status = KeyStatus::Invalid;
                    s.key_notice = Some(NOTICE_KEY_LENGTH.to_string());
                    return Ok(vec![]);
                }

                info!(key = %key_fingerprint(&s.api_key), "validating API key");
                s.key_status = KeyStatus::Checking;
                s.key_notice = None;
                Ok(vec![Effect::FetchLanguages {
                    api_key: s.api_key.clone(),
                }])
            }

            Msg::ApiKeyEdit => {
                s.key_status = KeyStatus::Editing;
                Ok(vec![])
            }

            Msg::ApiKeyForget => {
                s.api_key.clear();
                s.key_status = KeyStatus::Editing;
                s.key_notice = None;
                Ok(vec![Effect::ForgetApiKey])
            }

            Msg::LanguagesLoaded { api_key, result } => {
                // the key was edited while the check ran
                if api_key != s.api_key || s.key_status != KeyStatus::Checking {
                    debug!(key = %key_fingerprint(&api_key), "dropping stale language list");
                    return Ok(vec![]);
                }

                match result {
                    Ok(options) => {
                        info!(
                            key = %key_fingerprint(&api_key),
                            sources = options.source.len(),
                            targets = options.target.len(),
                            "API key accepted"
                        );
                        s.language_options = options;
                        s.key_status = KeyStatus::Valid;
                        s.key_notice = None;

                        // a query that settled while the key was being edited
                        let mut effects = vec![Effect::PersistApiKey(api_key)];
                        effects.extend(retranslate(s));
                        Ok(effects)
                    }
                    Err(e) => {
                        info!(key = %key_fingerprint(&api_key), error = %e, "API key rejected");
                        s.key_status = KeyStatus::Invalid;
                        s.key_notice = Some(NOTICE_KEY_REJECTED.to_string());
                        Ok(vec![])
                    }
                }
            }

            Msg::LanguagesChanged { source, target } => {
                ensure_enabled(s)?;
                let pair = LanguagePair {
                    source: resolve(&s.language_options, LanguageKind::Source, &source)?,
                    target: resolve(&s.language_options, LanguageKind::Target, &target)?,
                };
                s.active_languages = normalize::normalize(pair);
                Ok(retranslate(s))
            }

            Msg::ReverseDirection => {
                ensure_enabled(s)?;
                s.active_languages = normalize::reverse(s.active_languages.clone());
                Ok(retranslate(s))
            }

            Msg::QueryChanged(text) => {
                ensure_enabled(s)?;
                s.query = text.clone();
                Ok(vec![Effect::Debounce(text)])
            }

            Msg::QueryStabilized(text) => {
                s.stable_query = text;
                if s.stable_query.is_empty() {
                    s.translation.clear();
                    s.detected_source_language = None;
                    return Ok(vec![]);
                }
                Ok(retranslate(s))
            }

            Msg::TranslationResolved(result) => {
                s.in_flight = s.in_flight.saturating_sub(1);
                match result {
                    Ok(t) => {
                        s.translation = t.text;
                        s.detected_source_language = t.detected_source_language;
                    }
                    Err(e) => {
                        info!(error = %e, "translation failed");
                        s.translation = TRANSLATION_FALLBACK.to_string();
                        s.detected_source_language = None;
                    }
                }
                Ok(vec![])
            }
        }
    }
}

fn ensure_enabled(s: &AppState) -> CoreResult<()> {
    if s.is_form_enabled() {
        Ok(())
    } else {
        Err(CoreError::FormDisabled)
    }
}

fn resolve(options: &LanguageOptions, kind: LanguageKind, code: &str) -> CoreResult<Language> {
    options
        .find(kind, code)
        .cloned()
        .ok_or_else(|| CoreError::UnknownLanguage(code.to_string()))
}

fn retranslate(s: &mut AppState) -> Vec<Effect> {
    if s.stable_query.is_empty() || !s.is_form_enabled() {
        return vec![];
    }

    s.in_flight += 1;
    vec![Effect::Translate {
        api_key: s.api_key.clone(),
        text: s.stable_query.clone(),
        languages: s.active_languages.clone(),
    }]
}
