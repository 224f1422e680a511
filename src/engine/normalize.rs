//! Text normalization shared by every comparison in the engine.
//!
//! Platform detection, delta extraction, all matching tiers and the
//! verification guard tokenize through this module so they can never disagree
//! about what a "word" is.

/// A whitespace-delimited word with its comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The word as it appeared, casing and punctuation intact.
    pub raw: &'a str,
    /// Byte offset of `raw` in the source text.
    pub start: usize,
    /// Lowercase with punctuation stripped. Never empty.
    pub key: String,
}

/// Lowercase a word and strip everything but letters, digits and inner
/// apostrophes ("don't" stays "don't", "morning," becomes "morning").
pub fn normalize_word(word: &str) -> String {
    let kept: String = word
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '\u{2019}')
        .flat_map(char::to_lowercase)
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .collect();
    kept.trim_matches('\'').to_string()
}

/// Split `text` into tokens, dropping words that are pure punctuation.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let base = text.as_ptr() as usize;
    text.split_whitespace()
        .filter_map(|raw| {
            let key = normalize_word(raw);
            if key.is_empty() {
                return None;
            }
            Some(Token {
                raw,
                start: raw.as_ptr() as usize - base,
                key,
            })
        })
        .collect()
}

/// Normalized word list of `text`.
pub fn words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.key).collect()
}

/// Length of the longest common prefix of two word lists.
pub fn common_prefix_len<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> usize {
    a.iter()
        .zip(b)
        .take_while(|(x, y)| x.as_ref() == y.as_ref())
        .count()
}

/// Strip `prefix` from the start of `text`, comparing case-insensitively.
///
/// Walks both strings char by char so the returned slice is always on a char
/// boundary of `text`, even when lowercasing changes byte lengths.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = text.char_indices();
    for p in prefix.chars() {
        let (_, t) = rest.next()?;
        if !t.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    match rest.next() {
        Some((idx, _)) => Some(&text[idx..]),
        None => Some(""),
    }
}

/// The last `n` characters of `text`.
pub fn tail_chars(text: &str, n: usize) -> &str {
    let count = text.chars().count();
    if count <= n {
        return text;
    }
    match text.char_indices().nth(count - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Join two text fragments with a single space, skipping empty sides.
pub fn join_spaced(a: &str, b: &str) -> String {
    let (a, b) = (a.trim(), b.trim());
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word_strips_punctuation() {
        assert_eq!(normalize_word("Morning,"), "morning");
        assert_eq!(normalize_word("\"Hello!\""), "hello");
        assert_eq!(normalize_word("don't"), "don't");
        assert_eq!(normalize_word("Don\u{2019}t"), "don't");
        assert_eq!(normalize_word("'quoted'"), "quoted");
        assert_eq!(normalize_word("--"), "");
    }

    #[test]
    fn test_tokenize_keeps_offsets() {
        let text = "Good  morning, — how";
        let tokens = tokenize(text);
        let keys: Vec<_> = tokens.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["good", "morning", "how"]);
        assert_eq!(&text[tokens[2].start..], "how");
        assert_eq!(tokens[1].raw, "morning,");
    }

    #[test]
    fn test_common_prefix_len() {
        let a = words("good morning");
        let b = words("good morning how are you");
        assert_eq!(common_prefix_len(&a, &b), 2);
        assert_eq!(common_prefix_len(&b, &words("good night")), 1);
        assert_eq!(common_prefix_len::<String, String>(&[], &b), 0);
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(
            strip_prefix_ignore_case("Good Morning everyone", "good morning"),
            Some(" everyone")
        );
        assert_eq!(strip_prefix_ignore_case("good", "good"), Some(""));
        assert_eq!(strip_prefix_ignore_case("go", "good"), None);
        assert_eq!(strip_prefix_ignore_case("bad morning", "good"), None);
    }

    #[test]
    fn test_tail_chars_is_char_safe() {
        assert_eq!(tail_chars("hello world", 5), "world");
        assert_eq!(tail_chars("short", 200), "short");
        assert_eq!(tail_chars("ääää", 2), "ää");
    }

    #[test]
    fn test_join_spaced() {
        assert_eq!(join_spaced("hello ", " world"), "hello world");
        assert_eq!(join_spaced("", "world"), "world");
        assert_eq!(join_spaced("hello", "  "), "hello");
    }
}
