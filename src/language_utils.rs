/*!
 * Language utilities for prompt language names.
 *
 * Languages can be given as ISO 639-1 (2-letter) codes, ISO 639-2 (3-letter)
 * codes or English names. Prompts always use the English name.
 */

use isolang::Language;

use crate::errors::ConfigError;

// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let terminology = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(terminology)
}

/// Look up a language from an ISO 639-1 or ISO 639-2 code
pub fn language_from_code(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => bibliographic_to_terminology(&normalized_code)
            .and_then(Language::from_639_3)
            .or_else(|| Language::from_639_3(&normalized_code)),
        _ => None,
    }
}

/// Look up a language from its English name, ignoring case
pub fn language_from_name(name: &str) -> Option<Language> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Language::from_name(name).or_else(|| {
        let mut chars = name.chars();
        let first = chars.next()?;
        let capitalized: String = first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect();
        Language::from_name(&capitalized)
    })
}

/// Resolve a code or name to the English language name used in prompts
pub fn resolve_language_name(language: &str) -> Result<String, ConfigError> {
    language_from_code(language)
        .or_else(|| language_from_name(language))
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| ConfigError::UnknownLanguage(language.to_string()))
}

/// Short code used in output file names: ISO 639-1 when it exists, ISO 639-3 otherwise
pub fn file_code(language: &str) -> Option<String> {
    let lang = language_from_code(language).or_else(|| language_from_name(language))?;
    Some(lang.to_639_1().unwrap_or_else(|| lang.to_639_3()).to_string())
}
