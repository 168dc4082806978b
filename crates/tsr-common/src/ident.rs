//! Identifier helpers.

/// Make `name` usable as a package segment or script property name.
///
/// A leading digit and every character outside `[A-Za-z0-9_$]` or the
/// non-ASCII range starting at U+00A0 is replaced with `_`.
pub fn safe_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, ch) in name.chars().enumerate() {
        let valid = match ch {
            'a'..='z' | 'A'..='Z' | '_' | '$' => true,
            '0'..='9' => i > 0,
            c => c >= '\u{A0}',
        };
        out.push(if valid { ch } else { '_' });
    }
    out
}

/// Whether `name` can be written as a bare script property name.
pub fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty() && safe_identifier(name) == name
}

#[cfg(test)]
#[path = "../tests/ident_tests.rs"]
mod ident_tests;
