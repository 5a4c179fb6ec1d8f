use crate::model::language::{Language, LanguagePair};

// DeepL accepts only the generic code on the source side and only the
// regional code on the target side for these two languages.
const ENGLISH: (&str, &str) = ("EN", "English");
const ENGLISH_BRITISH: (&str, &str) = ("EN-GB", "English (British)");
const PORTUGUESE: (&str, &str) = ("PT", "Portuguese");
const PORTUGUESE_EUROPEAN: (&str, &str) = ("PT-PT", "Portuguese (European)");

pub fn normalize(pair: LanguagePair) -> LanguagePair {
    LanguagePair {
        source: normalize_source(pair.source),
        target: normalize_target(pair.target),
    }
}

/// Swaps the direction; the result is normalized like any other mutation.
pub fn reverse(pair: LanguagePair) -> LanguagePair {
    normalize(LanguagePair {
        source: pair.target,
        target: pair.source,
    })
}

fn normalize_source(lang: Language) -> Language {
    if is_regional_of(&lang.code, ENGLISH.0) {
        return Language::new(ENGLISH.0, ENGLISH.1);
    }
    if is_regional_of(&lang.code, PORTUGUESE.0) {
        return Language::new(PORTUGUESE.0, PORTUGUESE.1);
    }
    lang
}

fn normalize_target(lang: Language) -> Language {
    if lang.is(ENGLISH.0) {
        return Language::new(ENGLISH_BRITISH.0, ENGLISH_BRITISH.1);
    }
    if lang.is(PORTUGUESE.0) {
        return Language::new(PORTUGUESE_EUROPEAN.0, PORTUGUESE_EUROPEAN.1);
    }
    lang
}

fn is_regional_of(code: &str, base: &str) -> bool {
    match code.split_once('-') {
        Some((head, region)) => head.eq_ignore_ascii_case(base) && !region.is_empty(),
        None => false,
    }
}
