/*!
 * Tests for language code utilities
 */

use ltwai::language_utils::{
    LanguageCodeType, display_name, get_language_name, language_codes_match,
    normalize_to_part2t, validate_language_code,
};

/// Two- and three-letter codes are recognized
#[test]
fn test_validate_language_code_withKnownCodes_shouldReturnType() {
    assert_eq!(validate_language_code("pt").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("por").unwrap(), LanguageCodeType::Part2T);
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("").is_err());
}

/// Codes normalize to ISO 639-2/T
#[test]
fn test_normalize_to_part2t_withVariants_shouldReturnThreeLetterCode() {
    assert_eq!(normalize_to_part2t("pt").unwrap(), "por");
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fra").unwrap(), "fra");
}

/// Different spellings of the same language match
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("de", "deu"));
    assert!(!language_codes_match("pt", "es"));
    assert!(!language_codes_match("pt", "xx"));
}

/// Names are in English
#[test]
fn test_get_language_name_withCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("pt").unwrap(), "Portuguese");
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert!(get_language_name("zz").is_err());
}

/// Unknown codes are shown as typed
#[test]
fn test_display_name_withUnknownCode_shouldFallBackToCode() {
    assert_eq!(display_name("es"), "Spanish");
    assert_eq!(display_name(" klingon "), "klingon");
}
