//! Locale utilities bridging host language codes and GlobalSight locales
//!
//! The host identifies content languages with ISO 639 codes (`en`, `fra`)
//! while GlobalSight file profiles list locales such as `en_US` or `fr_FR`.

use anyhow::{anyhow, Result};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T equivalents
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Split a locale into its language part and optional region part
///
/// Both `_` and `-` are accepted as separators: `fr_FR`, `pt-BR`, `de`.
pub fn split_locale(locale: &str) -> (String, Option<String>) {
    let trimmed = locale.trim();
    match trimmed.split_once(['_', '-']) {
        Some((language, region)) if !region.is_empty() => {
            (language.to_lowercase(), Some(region.to_uppercase()))
        }
        Some((language, _)) => (language.to_lowercase(), None),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&normalized_code) {
                return Ok(lang.to_639_3().to_string());
            }
        }
        3 => {
            if Language::from_639_3(&normalized_code).is_some() {
                return Ok(normalized_code);
            }
            if let Some((_, part2t)) = PART2B_TO_PART2T
                .iter()
                .find(|(part2b, _)| *part2b == normalized_code)
            {
                return Ok((*part2t).to_string());
            }
        }
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Validate that a code is a known ISO 639-1 or ISO 639-2 language
pub fn validate_language_code(code: &str) -> Result<()> {
    normalize_to_part2t(code).map(|_| ())
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check whether a GlobalSight locale serves a host language code
///
/// A full locale given as the language (`en_US` vs `en_US`) must match
/// exactly; a bare language (`en`, `eng`) matches any region of it.
pub fn locale_matches_language(locale: &str, language: &str) -> bool {
    let (locale_language, locale_region) = split_locale(locale);
    let (wanted_language, wanted_region) = split_locale(language);

    if let Some(region) = wanted_region {
        return locale_region.as_deref() == Some(region.as_str())
            && (locale_language == wanted_language
                || language_codes_match(&locale_language, &wanted_language));
    }

    locale_language == wanted_language || language_codes_match(&locale_language, &wanted_language)
}

/// English language name for a locale or language code
pub fn get_language_name(code: &str) -> Result<String> {
    let (language, _) = split_locale(code);
    let normalized = normalize_to_part2t(&language)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// `fr_FR (French)`, or the bare locale when its language is unknown
pub fn describe_locale(locale: &str) -> String {
    match get_language_name(locale) {
        Ok(name) => format!("{} ({})", locale, name),
        Err(_) => locale.to_string(),
    }
}
