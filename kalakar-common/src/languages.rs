//! Supported languages
//!
//! Each entry pairs the platform language code with the locale used for
//! speech recognition and the Text-to-Speech voice. Unknown codes fall back
//! to US English.

use serde::Serialize;

/// Speech locale used when a language code is unknown
pub const FALLBACK_SPEECH_LOCALE: &str = "en-US";

/// Voice used when a language code is unknown
pub const FALLBACK_VOICE: &str = "en-US-Wavenet-D";

/// A platform language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    #[serde(skip)]
    pub speech_locale: &'static str,
    #[serde(skip)]
    pub voice_name: &'static str,
}

const fn lang(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    speech_locale: &'static str,
    voice_name: &'static str,
) -> Language {
    Language {
        code,
        name,
        native_name,
        speech_locale,
        voice_name,
    }
}

/// All languages offered by the voice assistant
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    lang("en", "English", "English", "en-US", "en-US-Wavenet-D"),
    lang("hi", "Hindi", "हिन्दी", "hi-IN", "hi-IN-Wavenet-A"),
    lang("bn", "Bengali", "বাংলা", "bn-IN", "bn-IN-Wavenet-A"),
    lang("te", "Telugu", "తెలుగు", "te-IN", "te-IN-Wavenet-A"),
    lang("mr", "Marathi", "मराठी", "mr-IN", "mr-IN-Wavenet-A"),
    lang("ta", "Tamil", "தமிழ்", "ta-IN", "ta-IN-Wavenet-A"),
    lang("ur", "Urdu", "اردو", "ur-IN", "ur-IN-Wavenet-A"),
    lang("gu", "Gujarati", "ગુજરાતી", "gu-IN", "gu-IN-Wavenet-A"),
    lang("kn", "Kannada", "ಕನ್ನಡ", "kn-IN", "kn-IN-Wavenet-A"),
    lang("or", "Odia", "ଓଡ଼ିଆ", "or-IN", "or-IN-Wavenet-A"),
    lang("pa", "Punjabi", "ਪੰਜਾਬੀ", "pa-IN", "pa-IN-Wavenet-A"),
    lang("as", "Assamese", "অসমীয়া", "as-IN", "as-IN-Wavenet-A"),
    lang("ml", "Malayalam", "മലയാളം", "ml-IN", "ml-IN-Wavenet-A"),
    lang("ne", "Nepali", "नेपाली", "ne-NP", "ne-NP-Wavenet-A"),
    lang("sa", "Sanskrit", "संस्कृतम्", "sa-IN", "sa-IN-Wavenet-A"),
    lang("sd", "Sindhi", "سنڌي", "sd-IN", "sd-IN-Wavenet-A"),
    lang("ks", "Kashmiri", "کٲشُر", "ks-IN", "ks-IN-Wavenet-A"),
    lang("bo", "Bodo", "बड़ो", "bo-CN", "bo-CN-Wavenet-A"),
    lang("mni", "Manipuri", "মৈতৈলোন্", "mni-IN", "mni-IN-Wavenet-A"),
    lang("sat", "Santali", "ᱥᱟᱱᱛᱟᱲᱤ", "sat-IN", "sat-IN-Wavenet-A"),
    lang("kok", "Konkani", "कोंकणी", "kok-IN", "kok-IN-Wavenet-A"),
    lang("mai", "Maithili", "मैथिली", "mai-IN", "mai-IN-Wavenet-A"),
];

/// Look up a language by its platform code
pub fn find(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

/// Speech recognition / synthesis locale for a language code
pub fn speech_locale(code: &str) -> &'static str {
    find(code).map_or(FALLBACK_SPEECH_LOCALE, |l| l.speech_locale)
}

/// Text-to-Speech voice name for a language code
pub fn voice_name(code: &str) -> &'static str {
    find(code).map_or(FALLBACK_VOICE, |l| l.voice_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language() {
        assert_eq!(speech_locale("hi"), "hi-IN");
        assert_eq!(voice_name("ne"), "ne-NP-Wavenet-A");
        assert_eq!(speech_locale("bo"), "bo-CN");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        assert_eq!(speech_locale("xx"), "en-US");
        assert_eq!(voice_name(""), "en-US-Wavenet-D");
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len());
        assert_eq!(SUPPORTED_LANGUAGES.len(), 22);
    }

    #[test]
    fn test_serialization_hides_voice_details() {
        let json = serde_json::to_value(find("ta").unwrap()).unwrap();
        assert_eq!(json["code"], "ta");
        assert_eq!(json["nativeName"], "தமிழ்");
        assert!(json.get("voiceName").is_none());
        assert!(json.get("speechLocale").is_none());
    }
}
