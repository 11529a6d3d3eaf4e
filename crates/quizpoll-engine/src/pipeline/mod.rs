//! # Pipeline Orchestration
//!
//! One raw item in, one verdict out:
//!
//! 1. **Parse** (`parse`): structured record first, then the text path
//!    (decode → extract → lex → build) when the input is not a record.
//! 2. **Check** (`check`): validate against the profile, then normalize.
//!
//! Every step is a pure function of its inputs. Nothing is retried: a failure
//! is reported as a value and the next item is independent of it.

pub mod batch;

use serde::Serialize;

use crate::{
    models::{CanonicalQuestion, LimitProfile, ValidationViolation},
    parsing::{
        MissingPart, ParseError, ParseFailure, StructuredRecord, from_record, parse_record,
        parse_text,
    },
    validation::{normalize, validate},
};

pub use batch::{BatchReport, BatchSummary, ItemOutcome, process_batch};

/// One item as handed to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// An already-decoded record; no JSON parsing happens.
    Structured(StructuredRecord),
    /// Raw text, either a JSON record or a GIFT-like item.
    Text(String),
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_string())
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

impl From<StructuredRecord> for RawInput {
    fn from(record: StructuredRecord) -> Self {
        RawInput::Structured(record)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PipelineResult {
    /// Fits the profile, possibly after truncation.
    Accepted(CanonicalQuestion),
    /// Well formed but does not fit the profile.
    Rejected(Vec<ValidationViolation>),
    /// Could not be turned into a question at all.
    ParseFailed(ParseFailure),
}

impl PipelineResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PipelineResult::Accepted(_))
    }
}

/// Runs one item through the whole pipeline.
pub fn process(raw: &RawInput, profile: &LimitProfile) -> PipelineResult {
    match parse(raw) {
        Ok(q) => check(&q, profile),
        Err(e) => PipelineResult::ParseFailed(e.reason()),
    }
}

/// Turns a raw item into a [`CanonicalQuestion`].
pub fn parse(raw: &RawInput) -> Result<CanonicalQuestion, ParseError> {
    let parsed = match raw {
        // A decoded record has no text form to fall back to.
        RawInput::Structured(record) => from_record(record).map_err(|e| match e {
            ParseError::NotAStructuredRecord => ParseError::Incomplete {
                missing: MissingPart::Options,
            },
            other => other,
        }),
        RawInput::Text(text) => match parse_record(text) {
            Err(ParseError::NotAStructuredRecord) => parse_text(text),
            other => other,
        },
    };
    match &parsed {
        Ok(q) => log::trace!(
            "Parsed {:?} question with {} options",
            q.source_format,
            q.options.len()
        ),
        Err(e) => log::trace!("Parse failed: {e}"),
    }
    parsed
}

/// Validates an already parsed question and normalizes it when allowed.
pub fn check(q: &CanonicalQuestion, profile: &LimitProfile) -> PipelineResult {
    let violations = validate(q, profile);
    if !violations.is_empty() {
        log::trace!("{} violation(s): {:?}", violations.len(), violations);
    }
    match normalize(q, &violations, profile) {
        Ok(normalized) => PipelineResult::Accepted(normalized),
        Err(violations) => PipelineResult::Rejected(violations),
    }
}
