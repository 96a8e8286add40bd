//! SQL utility functions

/// Escape LIKE metacharacters (`%`, `_`, `\`) so user input matches literally.
///
/// Pair with `ESCAPE '\'` in the statement.
///
/// ```
/// use recordql_server::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
