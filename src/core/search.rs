/// Escape character used by every `LIKE ... ESCAPE` clause
pub const LIKE_ESCAPE: char = '\\';

/// Lower-cased `%term%` pattern where `%`, `_` and `\` in the term match literally
pub fn contains_pattern(term: Option<&str>) -> String {
    let term = term.map(str::trim).unwrap_or("").to_lowercase();

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
