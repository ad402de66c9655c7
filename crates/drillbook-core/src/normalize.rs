//! Answer normalization.
//!
//! Maps raw answer strings onto a comparable canonical form: boolean
//! synonyms collapse to [`TRUE_TOKEN`] / [`FALSE_TOKEN`], choice labels such
//! as `"(b)"` or `"B. London"` collapse to the bare uppercase letter, and
//! everything else is trimmed.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical token for every "true" synonym.
pub const TRUE_TOKEN: &str = "TRUE";
/// Canonical token for every "false" synonym.
pub const FALSE_TOKEN: &str = "FALSE";

const TRUE_SYNONYMS: &[&str] = &[
    "✅", "对", "正确", "√", "✓", "是", "yes", "y", "true", "t", "1", "对的",
];

const FALSE_SYNONYMS: &[&str] = &[
    "❌", "错", "错误", "×", "✗", "否", "no", "n", "false", "f", "0", "错的",
];

// Optional opening bracket or space, a letter A-D, then the end of the
// string or anything that is not a letter or digit.
static LEADING_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\(（\s]*([A-Da-d])(?:$|[^\p{L}\p{N}])").unwrap());

/// Normalize a raw answer into its canonical comparable form.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(token) = boolean_token(trimmed) {
        return token.to_string();
    }

    if let Some(letter) = choice_label(trimmed) {
        return letter.to_string();
    }

    trimmed.to_string()
}

/// Returns the canonical boolean token for a synonym, if `answer` is one.
pub fn boolean_token(answer: &str) -> Option<&'static str> {
    let lower = answer.trim().to_lowercase();
    if TRUE_SYNONYMS.contains(&lower.as_str()) {
        Some(TRUE_TOKEN)
    } else if FALSE_SYNONYMS.contains(&lower.as_str()) {
        Some(FALSE_TOKEN)
    } else {
        None
    }
}

/// Returns `true` if `normalized` is one of the canonical boolean tokens.
pub fn is_boolean_token(normalized: &str) -> bool {
    normalized == TRUE_TOKEN || normalized == FALSE_TOKEN
}

/// Extract a leading choice label (`"b"`, `"(C)"`, `"A. Paris"`) as an
/// uppercase letter.
///
/// A letter immediately followed by more word characters (`"Beijing"`) is
/// not a label.
pub fn choice_label(answer: &str) -> Option<char> {
    LEADING_LABEL
        .captures(answer)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_uppercase())
}
