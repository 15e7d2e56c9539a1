//! Language code validation and the built-in language catalog.

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Sentinel accepted as a source language to request detection.
pub const AUTO: &str = "auto";

/// Language used when detection fails or yields an unknown code.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Supported language codes with English and native names.
///
/// Region variants are only valid when listed here explicitly.
pub const SUPPORTED_LANGUAGES: &[(&str, &str, &str)] = &[
    ("af", "Afrikaans", "Afrikaans"),
    ("am", "Amharic", "አማርኛ"),
    ("ar", "Arabic", "العربية"),
    ("az", "Azerbaijani", "Azərbaycanca"),
    ("be", "Belarusian", "Беларуская"),
    ("bg", "Bulgarian", "Български"),
    ("bn", "Bengali", "বাংলা"),
    ("bs", "Bosnian", "Bosanski"),
    ("ca", "Catalan", "Català"),
    ("cs", "Czech", "Čeština"),
    ("cy", "Welsh", "Cymraeg"),
    ("da", "Danish", "Dansk"),
    ("de", "German", "Deutsch"),
    ("el", "Greek", "Ελληνικά"),
    ("en", "English", "English"),
    ("en-GB", "English (British)", "English (UK)"),
    ("en-US", "English (American)", "English (US)"),
    ("es", "Spanish", "Español"),
    ("et", "Estonian", "Eesti"),
    ("eu", "Basque", "Euskara"),
    ("fa", "Persian", "فارسی"),
    ("fi", "Finnish", "Suomi"),
    ("fil", "Filipino", "Filipino"),
    ("fr", "French", "Français"),
    ("ga", "Irish", "Gaeilge"),
    ("gl", "Galician", "Galego"),
    ("gu", "Gujarati", "ગુજરાતી"),
    ("he", "Hebrew", "עברית"),
    ("hi", "Hindi", "हिन्दी"),
    ("hr", "Croatian", "Hrvatski"),
    ("hu", "Hungarian", "Magyar"),
    ("hy", "Armenian", "Հայերեն"),
    ("id", "Indonesian", "Bahasa Indonesia"),
    ("is", "Icelandic", "Íslenska"),
    ("it", "Italian", "Italiano"),
    ("ja", "Japanese", "日本語"),
    ("ka", "Georgian", "ქართული"),
    ("kk", "Kazakh", "Қазақ тілі"),
    ("km", "Khmer", "ខ្មែរ"),
    ("kn", "Kannada", "ಕನ್ನಡ"),
    ("ko", "Korean", "한국어"),
    ("la", "Latin", "Latina"),
    ("lo", "Lao", "ລາວ"),
    ("lt", "Lithuanian", "Lietuvių"),
    ("lv", "Latvian", "Latviešu"),
    ("mk", "Macedonian", "Македонски"),
    ("ml", "Malayalam", "മലയാളം"),
    ("mn", "Mongolian", "Монгол"),
    ("mr", "Marathi", "मराठी"),
    ("ms", "Malay", "Bahasa Melayu"),
    ("mt", "Maltese", "Malti"),
    ("my", "Myanmar (Burmese)", "မြန်မာ"),
    ("nb", "Norwegian Bokmål", "Norsk bokmål"),
    ("ne", "Nepali", "नेपाली"),
    ("nl", "Dutch", "Nederlands"),
    ("no", "Norwegian", "Norsk"),
    ("pa", "Punjabi", "ਪੰਜਾਬੀ"),
    ("pl", "Polish", "Polski"),
    ("ps", "Pashto", "پښتو"),
    ("pt", "Portuguese", "Português"),
    ("pt-BR", "Portuguese (Brazilian)", "Português (Brasil)"),
    ("pt-PT", "Portuguese (European)", "Português (Portugal)"),
    ("ro", "Romanian", "Română"),
    ("ru", "Russian", "Русский"),
    ("si", "Sinhala", "සිංහල"),
    ("sk", "Slovak", "Slovenčina"),
    ("sl", "Slovenian", "Slovenščina"),
    ("sq", "Albanian", "Shqip"),
    ("sr", "Serbian", "Српски"),
    ("sv", "Swedish", "Svenska"),
    ("sw", "Swahili", "Kiswahili"),
    ("ta", "Tamil", "தமிழ்"),
    ("te", "Telugu", "తెలుగు"),
    ("th", "Thai", "ไทย"),
    ("tl", "Tagalog", "Tagalog"),
    ("tr", "Turkish", "Türkçe"),
    ("uk", "Ukrainian", "Українська"),
    ("ur", "Urdu", "اردو"),
    ("uz", "Uzbek", "Oʻzbekcha"),
    ("vi", "Vietnamese", "Tiếng Việt"),
    ("zh", "Chinese", "中文"),
    ("zh-CN", "Chinese (Simplified)", "简体中文"),
    ("zh-TW", "Chinese (Traditional)", "繁體中文"),
];

/// One entry of a language catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

/// Returns the built-in catalog sorted by English name.
pub fn static_catalog() -> Vec<Language> {
    let mut languages: Vec<Language> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name, native)| Language {
            code: (*code).to_string(),
            name: (*name).to_string(),
            native_name: (*native).to_string(),
        })
        .collect();
    languages.sort_by(|a, b| a.name.cmp(&b.name));
    languages
}

/// Returns the canonical spelling of a supported code, matching case-insensitively.
///
/// `auto` is returned as-is. Provider spellings with an underscore
/// (`pt_BR`) are accepted.
pub fn normalize_code(code: &str) -> Option<&'static str> {
    let code = code.trim();
    if code.eq_ignore_ascii_case(AUTO) {
        return Some(AUTO);
    }
    let code = code.replace('_', "-");
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(&code))
        .map(|(known, _, _)| *known)
}

/// Returns `true` if the code is supported or is `auto`.
pub fn validate(code: &str) -> bool {
    normalize_code(code).is_some()
}

/// Validates a source language, returning its canonical code.
pub fn validate_source(code: &str) -> Result<&'static str, TranslateError> {
    normalize_code(code).ok_or_else(|| invalid_code(code))
}

/// Validates a target language, returning its canonical code. `auto` is rejected.
pub fn validate_target(code: &str) -> Result<&'static str, TranslateError> {
    match normalize_code(code) {
        Some(AUTO) => Err(TranslateError::validation(
            "'auto' can only be used as the source language",
        )),
        Some(known) => Ok(known),
        None => Err(invalid_code(code)),
    }
}

/// Provider spellings that name a catalog language differently: script
/// subtags for Chinese and retired ISO 639 codes.
const PROVIDER_ALIASES: &[(&str, &str)] = &[
    ("zh-hans", "zh-CN"),
    ("zh-hant", "zh-TW"),
    ("iw", "he"),
    ("in", "id"),
];

/// Maps a provider-reported code back onto the catalog.
///
/// Tries known aliases and the exact code first, then its base language
/// (`en-AU` → `en`).
pub fn resolve_provider_code(code: &str) -> Option<&'static str> {
    let lowered = code.to_ascii_lowercase().replace('_', "-");
    if let Some(&(_, known)) = PROVIDER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
    {
        return Some(known);
    }
    normalize_code(code)
        .filter(|c| *c != AUTO)
        .or_else(|| {
            let base = code.split(['-', '_']).next()?;
            normalize_code(base).filter(|c| *c != AUTO)
        })
}

/// Returns the English name for a code, or the code itself when unknown.
pub fn language_name(code: &str) -> String {
    normalize_code(code)
        .and_then(|c| SUPPORTED_LANGUAGES.iter().find(|(known, _, _)| *known == c))
        .map_or_else(|| code.to_string(), |(_, name, _)| (*name).to_string())
}

/// Returns the native name for a code, if it is in the catalog.
pub fn native_name(code: &str) -> Option<&'static str> {
    let code = normalize_code(code)?;
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, _, native)| *native)
}

fn invalid_code(code: &str) -> TranslateError {
    TranslateError::validation(format!(
        "Invalid language code: '{code}'\n\n\
         Valid language codes (ISO 639-1): ja, en, zh-CN, ko, fr, de, es, ..."
    ))
}
