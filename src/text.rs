//! Case and accent folding for comparisons.
//!
//! Genre matching and name/artist ordering both compare strings with case and
//! diacritics ignored, so "Béta", "BETA" and "beta" are all the same key.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase `input` and strip its diacritics.
///
/// Characters are decomposed (NFD) and combining marks dropped, so `é`
/// becomes `e` and `ç` becomes `c`.
pub fn fold(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two strings ignoring case and diacritics.
pub fn compare_folded(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b))
}
