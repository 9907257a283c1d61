//! Language codes understood by the M2M100 checkpoints

use crate::core::errors::{Result, TranslationError};
use crate::core::models::LanguageInfo;

/// (code, English name) for every language M2M100 418M/1.2B can read and emit
pub const M2M100_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("ast", "Asturian"),
    ("az", "Azerbaijani"),
    ("ba", "Bashkir"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("br", "Breton"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("ceb", "Cebuano"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("ff", "Fulah"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fy", "Western Frisian"),
    ("ga", "Irish"),
    ("gd", "Scottish Gaelic"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("ha", "Hausa"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("ht", "Haitian Creole"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("ig", "Igbo"),
    ("ilo", "Iloko"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("jv", "Javanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("lb", "Luxembourgish"),
    ("lg", "Ganda"),
    ("ln", "Lingala"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mg", "Malagasy"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Burmese"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("ns", "Northern Sotho"),
    ("oc", "Occitan"),
    ("or", "Oriya"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sd", "Sindhi"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("ss", "Swati"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tn", "Tswana"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("wo", "Wolof"),
    ("xh", "Xhosa"),
    ("yi", "Yiddish"),
    ("yo", "Yoruba"),
    ("zh", "Chinese"),
    ("zu", "Zulu"),
];

/// Check whether a code is one of the M2M100 languages
pub fn is_supported(code: &str) -> bool {
    M2M100_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// English name for a supported code
pub fn language_name(code: &str) -> Option<&'static str> {
    M2M100_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Fail with [`TranslationError::UnsupportedLanguage`] for unknown codes
pub fn ensure_supported(code: &str) -> Result<()> {
    if is_supported(code) {
        Ok(())
    } else {
        Err(TranslationError::UnsupportedLanguage {
            code: code.to_string(),
        })
    }
}

/// Full table as API models
pub fn supported_languages() -> Vec<LanguageInfo> {
    M2M100_LANGUAGES
        .iter()
        .map(|(code, name)| LanguageInfo {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_one_hundred_unique_codes() {
        let codes: HashSet<_> = M2M100_LANGUAGES.iter().map(|(c, _)| *c).collect();
        assert_eq!(codes.len(), 100);
        assert_eq!(M2M100_LANGUAGES.len(), 100);
    }

    #[test]
    fn test_lookup() {
        assert!(is_supported("en"));
        assert!(is_supported("ar"));
        assert!(!is_supported("zz"));
        assert!(!is_supported("EN"));
        assert_eq!(language_name("ar"), Some("Arabic"));
    }

    #[test]
    fn test_ensure_supported() {
        assert!(ensure_supported("fr").is_ok());
        match ensure_supported("zz") {
            Err(TranslationError::UnsupportedLanguage { code }) => assert_eq!(code, "zz"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
