/// DeepL target language codes
const DEEPL_LANG_CODES: [&str; 121] = [
    "ACE", "AF", "AN", "AR", "AS", "AY", "AZ", "BA", "BE", "BG", "BHO", "BN", "BR", "BS", "CA",
    "CEB", "CKB", "CS", "CY", "DA", "DE", "EL", "EN", "EN-GB", "EN-US", "EO", "ES", "ES-419", "ET",
    "EU", "FA", "FI", "FR", "GA", "GL", "GN", "GOM", "GU", "HA", "HE", "HI", "HR", "HT", "HU",
    "HY", "ID", "IG", "IS", "IT", "JA", "JV", "KA", "KK", "KMR", "KO", "KY", "LA", "LB", "LMO",
    "LN", "LT", "LV", "MAI", "MG", "MI", "MK", "ML", "MN", "MR", "MS", "MT", "MY", "NB", "NE",
    "NL", "OC", "OM", "PA", "PAG", "PAM", "PL", "PRS", "PS", "PT", "PT-BR", "PT-PT", "QU", "RO",
    "RU", "SA", "SCN", "SK", "SL", "SQ", "SR", "ST", "SU", "SV", "SW", "TA", "TE", "TG", "TH",
    "TK", "TL", "TN", "TR", "TS", "TT", "UK", "UR", "UZ", "VI", "WO", "XH", "YI", "YUE", "ZH",
    "ZH-HANS", "ZH-HANT", "ZU",
];

/// All language codes supported by Google Cloud Translate NMT
const GOOGLE_TRANSLATE_LANG_CODES: [&str; 197] = [
    "ab", "ace", "ach", "af", "sq", "alz", "am", "ar", "hy", "as", "awa", "ay", "az", "ban", "bm",
    "ba", "eu", "btx", "bts", "bbc", "be", "bem", "bn", "bew", "bho", "bik", "bs", "br", "bg",
    "bua", "yue", "ca", "ceb", "ny", "zh-CN", "zh", "zh-TW", "cv", "co", "crh", "hr", "cs", "da",
    "din", "dv", "doi", "dov", "nl", "dz", "en", "eo", "et", "ee", "fj", "fil", "tl", "fi", "fr",
    "fr-FR", "fr-CA", "fy", "ff", "gaa", "gl", "lg", "ka", "de", "el", "gn", "gu", "ht", "cnh",
    "ha", "haw", "iw", "he", "hil", "hi", "hmn", "hu", "hrx", "is", "ig", "ilo", "id", "ga", "it",
    "ja", "jw", "jv", "kn", "pam", "kk", "km", "cgg", "rw", "ktu", "gom", "ko", "kri", "ku", "ckb",
    "ky", "lo", "ltg", "la", "lv", "lij", "li", "ln", "lt", "lmo", "luo", "lb", "mk", "mai", "mak",
    "mg", "ms", "ms-Arab", "ml", "mt", "mi", "mr", "chm", "mni-Mtei", "min", "lus", "mn", "my",
    "nr", "new", "ne", "nso", "no", "nus", "oc", "or", "om", "pag", "pap", "ps", "fa", "pl", "pt",
    "pt-PT", "pt-BR", "pa", "pa-Arab", "qu", "rom", "ro", "rn", "ru", "sm", "sg", "sa", "gd", "sr",
    "st", "crs", "shn", "sn", "scn", "szl", "sd", "si", "sk", "sl", "so", "su", "sw", "ss", "sv",
    "tg", "ta", "tt", "te", "tet", "th", "ti", "ts", "tn", "tr", "tk", "ak", "uk", "ur", "ug",
    "uz", "vi", "cy", "xh", "yi", "yo", "yua", "zu",
];

/// All language codes supported by Libretranslate
const LIBRE_TRANSLATE_LANG_CODES: [&str; 49] = [
    "en", "sq", "ar", "az", "eu", "bn", "bg", "ca", "zh-Hans", "zh-Hant", "cs", "da", "nl", "eo",
    "et", "fi", "fr", "gl", "de", "el", "he", "hi", "hu", "id", "ga", "it", "ja", "ko", "ky", "lv",
    "lt", "ms", "nb", "fa", "pl", "pt", "pt-BR", "ro", "ru", "sk", "sl", "es", "sv", "tl", "th",
    "tr", "uk", "ur", "vi",
];

use thiserror::Error;

use crate::config::TranslationProvider;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LanguageNormalizeError {
    #[error("the language `{0}` is not supported")]
    Unsupported(String),
}

/// Map an internal locale code to the code the provider expects for a target language
pub fn provider_lang_code(
    provider: &TranslationProvider,
    lang_code: &str,
) -> Result<String, LanguageNormalizeError> {
    match provider {
        TranslationProvider::GOOGLE => normalize(lang_code, &GOOGLE_TRANSLATE_LANG_CODES),
        TranslationProvider::DEEPL => normalize(&lang_code.to_uppercase(), &DEEPL_LANG_CODES),
        TranslationProvider::LIBRETRANSLATE => normalize(lang_code, &LIBRE_TRANSLATE_LANG_CODES),
    }
}

/// Same as [`provider_lang_code`] for the source side.
///
/// DeepL only accepts the base language as `source_lang`, eg: `EN` not `EN-GB`
pub fn source_lang_code(
    provider: &TranslationProvider,
    lang_code: &str,
) -> Result<String, LanguageNormalizeError> {
    let code = provider_lang_code(provider, lang_code)?;
    match provider {
        TranslationProvider::DEEPL => Ok(base_lang(&code).to_string()),
        _ => Ok(code),
    }
}

fn normalize(locale: &str, codes: &[&str]) -> Result<String, LanguageNormalizeError> {
    if let Some(code) = codes.iter().find(|c| c.eq_ignore_ascii_case(locale)) {
        return Ok(code.to_string());
    }

    //fall back to the base language
    //eg: zh-TW -> zh
    let base = base_lang(locale);
    codes
        .iter()
        .find(|c| base_lang(c).eq_ignore_ascii_case(base))
        .map(|c| c.to_string())
        .ok_or_else(|| LanguageNormalizeError::Unsupported(locale.to_string()))
}

fn base_lang(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}
