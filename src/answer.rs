//! Answer normalization and equivalence used by offline evaluation.
//!
//! The tolerance model is rounding-before-compare: both sides are rounded to
//! the nearest integer when they parse as numbers, with no configurable
//! epsilon. Unit words are stripped by plain substring removal, not word
//! boundaries ("millions" loses only "million", leaving a trailing "s") --
//! inherited behavior, kept for compatibility.

const STRIPPED_SYMBOLS: [&str; 3] = ["$", "%", ","];
const STRIPPED_UNITS: [&str; 3] = ["million", "billion", "thousand"];

/// Canonicalize a free-text answer for comparison: trim, lowercase, strip
/// currency/percent symbols and unit words, then round to the nearest
/// integer when the remainder parses as a number.
pub fn normalize_answer(raw: &str) -> String {
    let mut answer = raw.trim().to_lowercase();

    for symbol in STRIPPED_SYMBOLS {
        answer = answer.replace(symbol, "");
    }
    for unit in STRIPPED_UNITS {
        answer = answer.replace(unit, "");
    }
    let answer = answer.trim().to_string();

    // Non-finite and out-of-range values fall through to the string form
    // instead of saturating at the integer bounds.
    match answer.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => {
            (value.round() as i64).to_string()
        }
        _ => answer,
    }
}

/// Compare predicted vs. gold answers: numeric equality of the rounded
/// values when both normalized forms parse as numbers, exact string equality
/// of the normalized forms otherwise. Never fails; any parse failure falls
/// through to the string comparison.
pub fn compare_answers(predicted: &str, actual: &str) -> bool {
    let pred_norm = normalize_answer(predicted);
    let actual_norm = normalize_answer(actual);

    match (pred_norm.parse::<f64>(), actual_norm.parse::<f64>()) {
        (Ok(p), Ok(a)) => p == a,
        _ => pred_norm == actual_norm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_symbols_and_rounds() {
        assert_eq!(normalize_answer(" $1,000.50 "), "1001");
    }

    #[test]
    fn test_normalize_percentage() {
        assert_eq!(normalize_answer("14.1%"), "14");
        assert_eq!(normalize_answer("14.6%"), "15");
    }

    #[test]
    fn test_normalize_unit_words() {
        assert_eq!(normalize_answer("123 million"), "123");
        assert_eq!(normalize_answer("2.5 billion"), "3");
    }

    #[test]
    fn test_normalize_negative() {
        assert_eq!(normalize_answer("-56.2"), "-56");
    }

    #[test]
    fn test_normalize_non_numeric_returns_lowercased_stripped() {
        assert_eq!(normalize_answer("  Increase  "), "increase");
        assert_eq!(normalize_answer("N/A"), "n/a");
    }

    #[test]
    fn test_normalize_non_finite_and_huge_values_kept_as_text() {
        assert_eq!(normalize_answer("inf"), "inf");
        assert_eq!(normalize_answer("-inf"), "-inf");
        assert_eq!(normalize_answer("NaN"), "nan");
        assert_eq!(normalize_answer("1e300"), "1e300");
    }

    #[test]
    fn test_compare_non_finite_values() {
        assert!(compare_answers("inf", "inf"));
        assert!(!compare_answers("inf", "5"));
        // Both sides parse as NaN, and NaN never compares equal.
        assert!(!compare_answers("NaN", "nan"));
    }

    // Substring stripping is deliberately not word-boundary aware.
    #[test]
    fn test_substring_stripping_quirk() {
        assert_eq!(normalize_answer("millions"), "s");
        assert_eq!(normalize_answer("120 millions"), "120 s");
    }

    #[test]
    fn test_compare_rounds_both_sides() {
        assert!(compare_answers("14.1%", "14"));
        assert!(compare_answers("123 million", "123"));
        assert!(compare_answers("$1,234.00", "1234"));
    }

    #[test]
    fn test_compare_string_fallback() {
        assert!(!compare_answers("increase", "decrease"));
        assert!(compare_answers("increase", "INCREASE"));
    }

    #[test]
    fn test_compare_mixed_numeric_and_text() {
        assert!(!compare_answers("14", "fourteen"));
    }

    #[test]
    fn test_compare_rounding_boundary() {
        // 14.4 rounds to 14, 14.6 rounds to 15
        assert!(compare_answers("14.4", "14"));
        assert!(!compare_answers("14.6", "14"));
        assert!(compare_answers("14.6", "15"));
    }

    #[test]
    fn test_compare_empty_strings_equal() {
        assert!(compare_answers("", ""));
        assert!(!compare_answers("", "5"));
    }
}
