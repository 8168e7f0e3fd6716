/// 转义 LIKE 通配符（`%`、`_` 和转义符本身）
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("asha"), "asha");
        assert_eq!(escape_like_pattern("50%_x"), "50\\%\\_x");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
