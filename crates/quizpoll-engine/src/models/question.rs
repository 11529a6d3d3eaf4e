use serde::Serialize;

/// Explanation shown after answering when the source supplies none.
pub const DEFAULT_EXPLANATION: &str = "Respuesta correcta según la fuente oficial.";

/// Which input shape produced a [`CanonicalQuestion`]. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceFormat {
    StructuredRecord,
    TextSegments,
}

/// The single-answer multiple-choice question every input shape is turned into.
///
/// Records are never edited in place: normalization builds a new record so the
/// original parse stays available for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalQuestion {
    /// Free-form label, not subject to platform limits.
    pub title: Option<String>,
    /// The question text.
    pub stem: String,
    /// Answer choices; order is meaningful.
    pub options: Vec<String>,
    /// Index of the correct answer in `options`.
    pub correct_index: usize,
    /// Rationale shown after answering.
    pub explanation: Option<String>,
    pub source_format: SourceFormat,
}

impl CanonicalQuestion {
    /// The text of the correct option, if `correct_index` is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// The explanation, or [`DEFAULT_EXPLANATION`] when there is none.
    pub fn explanation_or_default(&self) -> &str {
        self.explanation
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(DEFAULT_EXPLANATION)
    }

    /// At least two options and an in-range correct index.
    pub fn is_parseable(&self) -> bool {
        self.options.len() >= 2 && self.correct_index < self.options.len()
    }
}

/// Length in characters, which is how poll limits are expressed.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> CanonicalQuestion {
        CanonicalQuestion {
            title: None,
            stem: "¿Capital de Francia?".to_string(),
            options: vec!["París".to_string(), "Madrid".to_string()],
            correct_index: 0,
            explanation: None,
            source_format: SourceFormat::TextSegments,
        }
    }

    #[test]
    fn correct_option_in_range() {
        assert_eq!(question().correct_option(), Some("París"));
    }

    #[test]
    fn correct_option_out_of_range() {
        let q = CanonicalQuestion {
            correct_index: 5,
            ..question()
        };
        assert_eq!(q.correct_option(), None);
        assert!(!q.is_parseable());
    }

    #[test]
    fn blank_explanation_falls_back_to_default() {
        let q = CanonicalQuestion {
            explanation: Some("   ".to_string()),
            ..question()
        };
        assert_eq!(q.explanation_or_default(), DEFAULT_EXPLANATION);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(char_len("París"), 5);
        assert_eq!("París".len(), 6);
    }
}
