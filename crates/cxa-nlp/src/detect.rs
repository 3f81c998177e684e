//! Detection of Amharic review text.

use std::sync::LazyLock;

use regex::Regex;

/// Any code point in the Ethiopic block.
static ETHIOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{1200}-\u{137F}]").expect("valid Ethiopic regex"));

/// Common Amharic words as users type them in Latin script.
pub const TRANSLITERATED_MARKERS: &[&str] = &["selam", "betam", "amasegnallo", "yene", "kefel"];

/// Returns `true` if `text` contains Ethiopic script or a transliterated
/// Amharic marker (case-insensitive substring).
#[must_use]
pub fn is_foreign_script(text: &str) -> bool {
    if ETHIOPIC_RE.is_match(text) {
        return true;
    }
    let lowered = text.to_lowercase();
    TRANSLITERATED_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethiopic_script_is_foreign() {
        assert!(is_foreign_script("ጥሩ መተግበሪያ ነው"));
        assert!(is_foreign_script("app is ok ሰላም"));
    }

    #[test]
    fn transliterated_markers_are_foreign_case_insensitively() {
        assert!(is_foreign_script("Betam tiru app"));
        assert!(is_foreign_script("SELAM everyone"));
    }

    #[test]
    fn marker_inside_a_longer_word_still_matches() {
        assert!(is_foreign_script("yenetwork"));
    }

    #[test]
    fn plain_english_is_not_foreign() {
        assert!(!is_foreign_script("Great service and fast transactions"));
        assert!(!is_foreign_script(""));
    }
}
