//! JSON question records as produced by authoring tools and database exports.

use serde::{Deserialize, Serialize};

use crate::models::{CanonicalQuestion, DEFAULT_EXPLANATION, SourceFormat};

use super::{MissingPart, ParseError};

/// A question with named fields. Field names vary between exporters, so the
/// common spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(alias = "text", alias = "pregunta")]
    pub question: String,
    #[serde(default, alias = "choices", alias = "opciones")]
    pub options: Vec<OptionEntry>,
    /// Defaults to 0 when absent.
    #[serde(
        default,
        alias = "correct_index",
        alias = "correctanswerindex",
        alias = "correctAnswerIndex"
    )]
    pub correct: Option<i64>,
    #[serde(default, alias = "feedback")]
    pub explanation: Option<String>,
}

/// An option is either a bare string or an object with a `text` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Text(String),
    Object { text: String },
}

impl OptionEntry {
    pub fn text(&self) -> &str {
        match self {
            OptionEntry::Text(text) | OptionEntry::Object { text } => text,
        }
    }
}

impl From<&str> for OptionEntry {
    fn from(text: &str) -> Self {
        OptionEntry::Text(text.to_string())
    }
}

/// Parses `raw` as a JSON record. Anything that is not a JSON object with a
/// question and at least two options is [`ParseError::NotAStructuredRecord`].
pub fn parse_record(raw: &str) -> Result<CanonicalQuestion, ParseError> {
    let record: StructuredRecord =
        serde_json::from_str(raw.trim()).map_err(|_| ParseError::NotAStructuredRecord)?;
    from_record(&record)
}

/// Converts an already-decoded record. Text is taken verbatim.
pub fn from_record(record: &StructuredRecord) -> Result<CanonicalQuestion, ParseError> {
    if record.options.len() < 2 {
        return Err(ParseError::NotAStructuredRecord);
    }
    let correct_index = usize::try_from(record.correct.unwrap_or(0)).map_err(|_| {
        ParseError::Incomplete {
            missing: MissingPart::CorrectAnswer,
        }
    })?;
    let explanation = record
        .explanation
        .clone()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    Ok(CanonicalQuestion {
        title: record.title.clone().filter(|t| !t.trim().is_empty()),
        stem: record.question.clone(),
        options: record
            .options
            .iter()
            .map(|o| o.text().to_string())
            .collect(),
        correct_index,
        explanation: Some(explanation),
        source_format: SourceFormat::StructuredRecord,
    })
}
