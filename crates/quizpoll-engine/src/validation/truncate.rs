/// Appended whenever text is cut anywhere but a sentence end.
pub const ELLIPSIS: &str = "...";

const SENTENCE_END: [char; 3] = ['.', '!', '?'];

/// Shortens `text` to at most `limit` characters, preferring a boundary that
/// keeps the meaning readable.
///
/// Within the first `limit - 3` characters, in order of preference:
/// 1. the last sentence end, if it keeps at least half of `limit`; no ellipsis;
/// 2. the last whitespace, followed by [`ELLIPSIS`];
/// 3. a hard cut, followed by [`ELLIPSIS`].
///
/// Limits of three characters or fewer leave no room for an ellipsis and are
/// hard cut. The result, minus any ellipsis, is always a prefix of `text`.
pub fn truncate(text: &str, limit: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= limit {
        return text.to_string();
    }
    if limit <= ELLIPSIS.len() {
        return chars[..limit].iter().collect();
    }

    let window = &chars[..limit - ELLIPSIS.len()];

    if let Some(end) = window.iter().rposition(|c| SENTENCE_END.contains(c))
        && (end + 1) * 2 >= limit
    {
        return window[..=end].iter().collect();
    }

    let kept: String = match window.iter().rposition(|c| c.is_whitespace()) {
        Some(space) if space > 0 => {
            let head: String = window[..space].iter().collect();
            head.trim_end().to_string()
        }
        _ => window.iter().collect(),
    };
    format!("{kept}{ELLIPSIS}")
}
