use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::model::language::{Language, LanguageKind, LanguagePair, Translation};

pub const DEFAULT_BASE_URL: &str = "https://api.deepl.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[async_trait]
pub trait TranslationApi: Send + Sync {
    async fn languages(&self, api_key: &str, kind: LanguageKind) -> Result<Vec<Language>, ApiError>;

    async fn translate(
        &self,
        api_key: &str,
        text: &str,
        languages: &LanguagePair,
    ) -> Result<Translation, ApiError>;
}

pub struct DeeplClient {
    client: Client,
    base_url: String,
}

impl DeeplClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(DeeplClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[async_trait]
impl TranslationApi for DeeplClient {
    async fn languages(&self, api_key: &str, kind: LanguageKind) -> Result<Vec<Language>, ApiError> {
        debug!(kind = kind.as_str(), "fetching supported languages");

        let resp = self
            .client
            .get(self.endpoint("/v2/languages"))
            .query(&[("auth_key", api_key), ("type", kind.as_str())])
            .send()
            .await?;

        let text = read_success(resp).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn translate(
        &self,
        api_key: &str,
        text: &str,
        languages: &LanguagePair,
    ) -> Result<Translation, ApiError> {
        debug!(
            source = %languages.source.code,
            target = %languages.target.code,
            chars = text.chars().count(),
            "requesting translation"
        );

        let params = [
            ("auth_key", api_key),
            ("source_lang", languages.source.code.as_str()),
            ("target_lang", languages.target.code.as_str()),
            ("text", text),
        ];

        let resp = self
            .client
            .post(self.endpoint("/v2/translate"))
            .form(&params)
            .send()
            .await?;

        let body = read_success(resp).await?;
        parse_translation(&body)
    }
}

async fn read_success(resp: reqwest::Response) -> Result<String, ApiError> {
    let status = resp.status();

    // read as text first so an error body is not lost when it isn't JSON
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: extract_error_message(&text),
        });
    }

    Ok(text)
}

fn parse_translation(body: &str) -> Result<Translation, ApiError> {
    let parsed: TranslateResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    if parsed.translations.is_empty() {
        return Err(ApiError::Decode("missing translations".into()));
    }

    let detected_source_language = parsed
        .translations
        .iter()
        .find_map(|t| t.detected_source_language.clone());

    let text = parsed
        .translations
        .into_iter()
        .map(|t| t.text)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Translation {
        text,
        detected_source_language,
    })
}

fn extract_error_message(body_text: &str) -> String {
    // DeepL: { "message": "..." }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body_text.trim();
    if trimmed.chars().count() > 400 {
        let snippet: String = trimmed.chars().take(400).collect();
        format!("{snippet}...")
    } else {
        trimmed.to_string()
    }
}

pub fn status_is_auth_failure(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::Status { status, .. }
            if *status == StatusCode::FORBIDDEN || *status == StatusCode::UNAUTHORIZED
    )
}
