pub mod canonical;
pub mod decode;
pub mod escape;
pub mod options;
pub mod record;
pub mod segments;
pub mod split;

use std::fmt;

use serde::Serialize;

use crate::models::CanonicalQuestion;

use decode::DecodeMode;

pub use canonical::build;
pub use record::{OptionEntry, StructuredRecord, from_record, parse_record};
pub use split::split_items;

/// A mandatory part the canonical builder could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MissingPart {
    Stem,
    /// Fewer than two options.
    Options,
    CorrectAnswer,
}

impl fmt::Display for MissingPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPart::Stem => write!(f, "question stem"),
            MissingPart::Options => write!(f, "at least two options"),
            MissingPart::CorrectAnswer => write!(f, "correct answer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ParseError {
    #[error("No option block found")]
    MissingOptionBlock,
    #[error("Not a structured record")]
    NotAStructuredRecord,
    #[error("Incomplete question: missing {missing}")]
    Incomplete { missing: MissingPart },
}

/// Coarse parse failure reason reported by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ParseFailure {
    MissingOptionBlock,
    NotAStructuredRecord,
    Incomplete,
}

impl ParseError {
    pub fn reason(&self) -> ParseFailure {
        match self {
            ParseError::MissingOptionBlock => ParseFailure::MissingOptionBlock,
            ParseError::NotAStructuredRecord => ParseFailure::NotAStructuredRecord,
            ParseError::Incomplete { .. } => ParseFailure::Incomplete,
        }
    }
}

/// Text path: decode, extract segments, lex options, build the record.
pub fn parse_text(raw: &str) -> Result<CanonicalQuestion, ParseError> {
    let decoded = decode::decode(raw, DecodeMode::Structural);
    let segments = segments::extract(&decoded)?;
    let lexed = options::lex(&segments.option_block);
    build(&segments, lexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_text_single_line() {
        let q = parse_text("¿Capital de Francia?{=París~Madrid~Roma}").unwrap();
        assert_eq!(q.stem, "¿Capital de Francia?");
        assert_eq!(q.options, vec!["París", "Madrid", "Roma"]);
        assert_eq!(q.correct_index, 0);
        assert_eq!(q.explanation, None);
    }

    #[test]
    fn parse_text_repairs_mojibake_before_parsing() {
        let q = parse_text("Â¿CuÃ¡l es la capital?{~Lisboa =MadrÃ\u{ad}d}").unwrap();
        assert_eq!(q.stem, "¿Cuál es la capital?");
        assert_eq!(q.options, vec!["Lisboa", "Madríd"]);
        assert_eq!(q.correct_index, 1);
    }

    #[test]
    fn parse_text_missing_block() {
        assert_eq!(
            parse_text("Sin bloque de opciones"),
            Err(ParseError::MissingOptionBlock)
        );
    }

    #[test]
    fn single_option_is_incomplete() {
        let err = parse_text("Stem{=OnlyOne}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Incomplete {
                missing: MissingPart::Options
            }
        );
        assert_eq!(err.reason(), ParseFailure::Incomplete);
    }

    #[test]
    fn error_messages() {
        let err = ParseError::Incomplete {
            missing: MissingPart::CorrectAnswer,
        };
        assert_eq!(err.to_string(), "Incomplete question: missing correct answer");
    }
}
