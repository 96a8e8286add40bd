//! String utility functions

/// Convert a snake_case identifier to PascalCase.
///
/// Underscores are dropped and the following character is upper-cased;
/// runs of underscores collapse.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
