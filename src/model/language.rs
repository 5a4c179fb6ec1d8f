use serde::{Deserialize, Serialize};

/// A language as the DeepL API lists it, e.g. `{ "language": "EN-GB", "name": "English (British)" }`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Language {
    #[serde(rename = "language")]
    pub code: String,

    #[serde(default)]
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn is(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LanguageKind {
    Source,
    Target,
}

impl LanguageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageKind::Source => "source",
            LanguageKind::Target => "target",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl Default for LanguagePair {
    fn default() -> Self {
        LanguagePair {
            source: Language::new("DE", "German"),
            target: Language::new("EN-US", "English (American)"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LanguageOptions {
    #[serde(default)]
    pub source: Vec<Language>,

    #[serde(default)]
    pub target: Vec<Language>,
}

impl LanguageOptions {
    /// Looks a code up in the list for `kind` first, then in the other list.
    ///
    /// Reversing a pair moves a target code (say `EN-US`) to the source side,
    /// where DeepL only lists `EN`; the normalizer fixes that afterwards.
    pub fn find(&self, kind: LanguageKind, code: &str) -> Option<&Language> {
        let (primary, secondary) = match kind {
            LanguageKind::Source => (&self.source, &self.target),
            LanguageKind::Target => (&self.target, &self.source),
        };

        primary
            .iter()
            .chain(secondary.iter())
            .find(|l| l.is(code))
    }
}

/// Result of one `/v2/translate` call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,

    #[serde(default)]
    pub detected_source_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_deepl_language_shape() {
        let l: Language =
            serde_json::from_str(r#"{"language":"EN-GB","name":"English (British)"}"#).unwrap();
        assert_eq!(l, Language::new("EN-GB", "English (British)"));
    }

    #[test]
    fn find_prefers_requested_side() {
        let options = LanguageOptions {
            source: vec![Language::new("EN", "English")],
            target: vec![
                Language::new("EN-US", "English (American)"),
                Language::new("DE", "German"),
            ],
        };

        assert_eq!(
            options.find(LanguageKind::Source, "en-us").map(|l| l.code.as_str()),
            Some("EN-US")
        );
        assert_eq!(
            options.find(LanguageKind::Source, "EN").map(|l| l.name.as_str()),
            Some("English")
        );
        assert!(options.find(LanguageKind::Target, "XX").is_none());
    }
}
