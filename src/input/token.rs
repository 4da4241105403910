//! Token comparison rules
//!
//! A token is one logical unit of typed input, always a single `char`.
//! Whitespace is interchangeable: any whitespace token satisfies any
//! whitespace character in a target text, regardless of case sensitivity.

/// Returns true if the token counts as whitespace.
pub fn is_whitespace(token: char) -> bool {
    token.is_whitespace()
}

/// Returns true if two tokens are considered equal.
///
/// If either side is whitespace, equality holds iff the other side is also
/// whitespace. Otherwise tokens compare exactly, or by their full Unicode
/// lowercase mapping when `case_sensitive` is false.
pub fn inputs_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if is_whitespace(a) || is_whitespace(b) {
        return is_whitespace(a) && is_whitespace(b);
    }
    if case_sensitive {
        a == b
    } else {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }
}

/// Single-character case variants of `c` that compare equal to it when
/// case is ignored. Mappings that expand to several characters are skipped.
pub(crate) fn case_variants(c: char) -> impl Iterator<Item = char> {
    let lower = single(c.to_lowercase());
    let upper = single(c.to_uppercase());
    [lower, upper]
        .into_iter()
        .flatten()
        .filter(move |v| inputs_equal(*v, c, false))
}

fn single(mut iter: impl Iterator<Item = char>) -> Option<char> {
    let first = iter.next()?;
    match iter.next() {
        None => Some(first),
        Some(_) => None,
    }
}
