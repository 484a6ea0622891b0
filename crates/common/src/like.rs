//! SQL `LIKE` patterns.
//!
//! Constraints carry their match text as a `LIKE` pattern with `\` as the
//! escape character. SQL backends bind the pattern as-is
//! (`... LIKE ? ESCAPE '\'`), other backends evaluate it with [`matches`].
//! Matching is case-sensitive; case folding is done by the caller on both
//! sides.

/// Escape character used in every pattern built by this crate
pub const ESCAPE: char = '\\';

/// Escape `\`, `%` and `_` so that `input` matches literally
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if c == ESCAPE || c == '%' || c == '_' {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern matching every string starting with `prefix`
pub fn prefix_pattern(prefix: &str) -> String {
    format!("{}%", escape(prefix))
}

/// Pattern matching every string containing `needle`
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape(needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `%`
    Any,
    /// `_`
    One,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            ESCAPE => Token::Literal(chars.next().unwrap_or(ESCAPE)),
            '%' => Token::Any,
            '_' => Token::One,
            c => Token::Literal(c),
        };
        tokens.push(token);
    }
    tokens
}

/// Evaluate a `LIKE` pattern against `text`
pub fn matches(pattern: &str, text: &str) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // position of the last `%` and the text offset it currently absorbs up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Any) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::One) => {
                p += 1;
                t += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((any, absorbed)) => {
                    p = any + 1;
                    t = absorbed + 1;
                    backtrack = Some((any, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    while let Some(Token::Any) = tokens.get(p) {
        p += 1;
    }
    p == tokens.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("50%_off"), r"50\%\_off");
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape("O'Brien"), "O'Brien");
    }

    #[test]
    fn test_wildcards() {
        assert!(matches("/sites/%", "/sites/demo"));
        assert!(matches("%news%", "/sites/demo/news/a"));
        assert!(matches("a_c", "abc"));
        assert!(!matches("a_c", "abbc"));
        assert!(matches("%", ""));
        assert!(!matches("abc", "abcd"));
        assert!(matches("%b%d", "abcbd"));
    }

    #[test]
    fn test_escaped_wildcards_match_literally() {
        let pattern = contains_pattern("50%");
        assert!(matches(&pattern, "save 50% today"));
        assert!(!matches(&pattern, "save 500 today"));

        let pattern = prefix_pattern("/a_b");
        assert!(matches(&pattern, "/a_b/c"));
        assert!(!matches(&pattern, "/axb/c"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches("%münchen%", "MÜNCHEN"));
        assert!(matches("%münchen%", "stadt münchen"));
    }

    #[test]
    fn test_escaped_backslash() {
        let pattern = contains_pattern(r#"say \"hi\""#);
        assert!(matches(&pattern, r#"{"text":"say \"hi\""}"#));
    }
}
