//! GIFT backslash escapes.
//!
//! `\=`, `\~`, `\#`, `\{`, `\}`, `\:` and `\\` stand for the literal character
//! and are never structural. Every delimiter search in the parser goes through
//! [`find_unescaped`] / [`rfind_unescaped`] so escaped delimiters are skipped
//! consistently.

pub const ESCAPE: char = '\\';

/// Characters that carry meaning in the GIFT notation.
pub const SPECIAL: [char; 6] = ['=', '~', '#', '{', '}', ':'];

/// Whether the byte at `idx` is preceded by an odd run of backslashes.
pub fn is_escaped(s: &str, idx: usize) -> bool {
    s.as_bytes()[..idx]
        .iter()
        .rev()
        .take_while(|&&b| b == ESCAPE as u8)
        .count()
        % 2
        == 1
}

/// Byte index of the first occurrence of `pat` that is not escaped.
pub fn find_unescaped(s: &str, pat: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = s[from..].find(pat) {
        let idx = from + rel;
        if !is_escaped(s, idx) {
            return Some(idx);
        }
        from = idx + 1;
    }
    None
}

/// Byte index of the last occurrence of `pat` that is not escaped.
pub fn rfind_unescaped(s: &str, pat: &str) -> Option<usize> {
    let mut end = s.len();
    while let Some(idx) = s[..end].rfind(pat) {
        if !is_escaped(s, idx) {
            return Some(idx);
        }
        // Delimiters are ASCII, so `idx + len - 1` is a char boundary.
        end = idx + pat.len() - 1;
    }
    None
}

/// Splits `s` at every unescaped occurrence of `pat`.
pub fn split_unescaped<'a>(s: &'a str, pat: &str) -> Vec<&'a str> {
    let mut parts = vec![];
    let mut rest = s;
    while let Some(idx) = find_unescaped(rest, pat) {
        parts.push(&rest[..idx]);
        rest = &rest[idx + pat.len()..];
    }
    parts.push(rest);
    parts
}

/// Resolves GIFT escapes into their literal characters.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE
            && let Some(&next) = chars.peek()
            && (SPECIAL.contains(&next) || next == ESCAPE)
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Escapes every GIFT special character so the text round-trips literally.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if SPECIAL.contains(&c) || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}
