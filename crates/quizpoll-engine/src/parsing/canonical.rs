use crate::models::{CanonicalQuestion, SourceFormat};

use super::{
    MissingPart, ParseError,
    decode::{DecodeMode, decode},
    options::{LexedBlock, clean_markup},
    segments::RawSegments,
};

/// Merges extracted segments and lexed options into a [`CanonicalQuestion`].
///
/// Field text is cleaned of markup and flattened to single spaces here, after
/// all line-based parsing is done. The explanation keeps one line per feedback
/// section.
pub fn build(segments: &RawSegments, lexed: LexedBlock) -> Result<CanonicalQuestion, ParseError> {
    let stem = Some(flatten(&segments.stem))
        .filter(|s| !s.is_empty())
        .or_else(|| lexed.preamble.as_deref().map(flatten))
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::Incomplete {
            missing: MissingPart::Stem,
        })?;

    if lexed.options.len() < 2 {
        return Err(ParseError::Incomplete {
            missing: MissingPart::Options,
        });
    }
    let correct_index = lexed.correct_index().ok_or(ParseError::Incomplete {
        missing: MissingPart::CorrectAnswer,
    })?;

    let explanation = lexed
        .feedback
        .as_deref()
        .map(|f| {
            f.lines()
                .map(|line| decode(line, DecodeMode::Flatten))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|e| !e.is_empty());

    Ok(CanonicalQuestion {
        title: segments
            .title
            .as_deref()
            .map(flatten)
            .filter(|t| !t.is_empty()),
        stem,
        options: lexed
            .options
            .iter()
            .map(|o| decode(&o.text, DecodeMode::Flatten))
            .collect(),
        correct_index,
        explanation,
        source_format: SourceFormat::TextSegments,
    })
}

fn flatten(text: &str) -> String {
    decode(&clean_markup(text), DecodeMode::Flatten)
}
