use std::sync::OnceLock;

use regex::Regex;

/// `=` / `~` answer prefixes.
pub struct AnswerMarker;

impl AnswerMarker {
    pub const CORRECT: u8 = b'=';
    pub const INCORRECT: u8 = b'~';

    /// `Some(true)` for `=`, `Some(false)` for `~`, `None` for anything else.
    pub fn correctness(b: u8) -> Option<bool> {
        match b {
            Self::CORRECT => Some(true),
            Self::INCORRECT => Some(false),
            _ => None,
        }
    }

    /// Whether a line of the block starts with a marker.
    pub fn leads(line: &str) -> bool {
        line.trim_start()
            .bytes()
            .next()
            .is_some_and(|b| Self::correctness(b).is_some())
    }
}

/// Moodle grade weight right after the marker: `=%100%`, `~%-33.33333%`.
pub struct Weight;

impl Weight {
    /// Splits a leading weight off `body`. An empty weight (`%%`) yields `None`
    /// but is still stripped.
    pub fn strip(body: &str) -> (Option<f32>, &str) {
        static WEIGHT: OnceLock<Regex> = OnceLock::new();
        let re = WEIGHT.get_or_init(|| {
            Regex::new(r"^\s*%([-+]?\d*\.?\d*)%").expect("Invalid weight regex")
        });
        match re.captures(body) {
            Some(caps) => {
                let weight = caps.get(1).and_then(|m| m.as_str().parse().ok());
                let end = caps.get(0).map_or(0, |m| m.end());
                (weight, &body[end..])
            }
            None => (None, body),
        }
    }
}

/// Per-option feedback: `=answer#well done`.
pub struct OptionFeedback;

impl OptionFeedback {
    pub const MARK: u8 = b'#';
}

/// The `####` general-feedback marker, with an optional localized label.
pub struct GeneralFeedback;

impl GeneralFeedback {
    /// Byte range of the first marker (including its label) in `block`.
    pub fn find(block: &str) -> Option<(usize, usize)> {
        static MARKER: OnceLock<Regex> = OnceLock::new();
        let re = MARKER.get_or_init(|| {
            Regex::new(
                r"(?i)####[ \t]*(?:(?:retroalimentaci[oó]n|feedback|explicaci[oó]n)[ \t]*:?)?",
            )
            .expect("Invalid feedback marker regex")
        });
        re.find(block).map(|m| (m.start(), m.end()))
    }

    /// Marker used to join additional feedback sections.
    pub const MARK: &'static str = "####";
}
