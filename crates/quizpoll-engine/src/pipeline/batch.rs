use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    models::{CanonicalQuestion, LimitProfile, ViolationKind, char_len},
    parsing::{ParseError, ParseFailure},
    validation::was_truncated,
};

use super::{PipelineResult, RawInput, check, parse};

/// Accepted stems above this share of `stem_max_len` count as near the limit.
const NEAR_LIMIT_PERCENT: usize = 90;

/// The fate of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    /// Position of the item in the batch input.
    pub index: usize,
    /// The record as parsed, before any normalization.
    pub original: Option<CanonicalQuestion>,
    pub parse_error: Option<ParseError>,
    pub result: PipelineResult,
}

impl ItemOutcome {
    pub fn was_truncated(&self) -> bool {
        match (&self.original, &self.result) {
            (Some(original), PipelineResult::Accepted(normalized)) => {
                was_truncated(original, normalized)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Includes truncated items.
    pub accepted: usize,
    pub truncated: usize,
    pub rejected: usize,
    pub parse_failed: usize,
    /// Items never processed because the batch was cancelled.
    pub skipped: usize,
    /// Accepted share of processed items, in percent.
    pub valid_percentage: f64,
    /// How often each violation kind appears in rejected items.
    pub violations: BTreeMap<ViolationKind, usize>,
    pub parse_failures: BTreeMap<ParseFailure, usize>,
    pub near_limit: usize,
}

impl BatchSummary {
    pub fn from_outcomes(total: usize, outcomes: &[ItemOutcome], profile: &LimitProfile) -> Self {
        let mut summary = BatchSummary {
            total,
            skipped: total.saturating_sub(outcomes.len()),
            ..Default::default()
        };

        for outcome in outcomes {
            match &outcome.result {
                PipelineResult::Accepted(q) => {
                    summary.accepted += 1;
                    if outcome.was_truncated() {
                        summary.truncated += 1;
                    }
                    if char_len(&q.stem) * 100 > profile.stem_max_len * NEAR_LIMIT_PERCENT {
                        summary.near_limit += 1;
                    }
                }
                PipelineResult::Rejected(violations) => {
                    summary.rejected += 1;
                    for v in violations {
                        *summary.violations.entry(v.kind).or_default() += 1;
                    }
                }
                PipelineResult::ParseFailed(reason) => {
                    summary.parse_failed += 1;
                    *summary.parse_failures.entry(*reason).or_default() += 1;
                }
            }
        }

        if !outcomes.is_empty() {
            summary.valid_percentage = summary.accepted as f64 * 100.0 / outcomes.len() as f64;
        }
        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total:        {}", self.total)?;
        writeln!(
            f,
            "Accepted:     {} ({:.1}%), {} truncated",
            self.accepted, self.valid_percentage, self.truncated
        )?;
        writeln!(f, "Rejected:     {}", self.rejected)?;
        for (kind, count) in &self.violations {
            writeln!(f, "  {kind:?}: {count}")?;
        }
        writeln!(f, "Parse failed: {}", self.parse_failed)?;
        for (reason, count) in &self.parse_failures {
            writeln!(f, "  {reason:?}: {count}")?;
        }
        if self.skipped > 0 {
            writeln!(f, "Skipped:      {}", self.skipped)?;
        }
        write!(f, "Near limit:   {}", self.near_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Outcomes of processed items, in input order.
    pub outcomes: Vec<ItemOutcome>,
    pub summary: BatchSummary,
}

/// Processes `items` in parallel against one shared profile.
///
/// `cancel` is checked before each item; items not started when it is set are
/// counted as skipped and have no outcome.
pub fn process_batch(
    items: &[RawInput],
    profile: &LimitProfile,
    cancel: &AtomicBool,
) -> BatchReport {
    let outcomes: Vec<ItemOutcome> = items
        .par_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            Some(process_item(index, raw, profile))
        })
        .collect();

    let summary = BatchSummary::from_outcomes(items.len(), &outcomes, profile);
    log::debug!(
        "Batch of {}: {} accepted ({} truncated), {} rejected, {} parse failures, {} skipped",
        summary.total,
        summary.accepted,
        summary.truncated,
        summary.rejected,
        summary.parse_failed,
        summary.skipped
    );

    BatchReport { outcomes, summary }
}

fn process_item(index: usize, raw: &RawInput, profile: &LimitProfile) -> ItemOutcome {
    match parse(raw) {
        Ok(q) => {
            let result = check(&q, profile);
            ItemOutcome {
                index,
                original: Some(q),
                parse_error: None,
                result,
            }
        }
        Err(e) => ItemOutcome {
            index,
            original: None,
            parse_error: Some(e),
            result: PipelineResult::ParseFailed(e.reason()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items() -> Vec<RawInput> {
        vec![
            "¿Capital de Francia?{=París~Madrid~Roma}".into(),
            format!("{}{{=a~b}}", "palabra ".repeat(30)).into(),
            "Pregunta{=OnlyOne}".into(),
            "Sin bloque".into(),
            format!("{}{{=a~b}}", "x".repeat(190)).into(),
        ]
    }

    #[test]
    fn outcomes_keep_input_order() {
        let report = process_batch(&items(), &LimitProfile::lenient(), &AtomicBool::new(false));
        let indexes: Vec<usize> = report.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn lenient_summary() {
        let report = process_batch(&items(), &LimitProfile::lenient(), &AtomicBool::new(false));
        let summary = report.summary;
        assert_eq!(summary.total, 5);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.truncated, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.parse_failed, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.valid_percentage, 40.0);
        assert_eq!(summary.violations, BTreeMap::from([(ViolationKind::TooLong, 1)]));
        assert_eq!(
            summary.parse_failures,
            BTreeMap::from([
                (ParseFailure::MissingOptionBlock, 1),
                (ParseFailure::Incomplete, 1),
            ])
        );
        assert_eq!(summary.near_limit, 1);
    }

    #[test]
    fn permissive_summary_counts_truncation() {
        let report = process_batch(&items(), &LimitProfile::permissive(), &AtomicBool::new(false));
        assert_eq!(report.summary.accepted, 3);
        assert_eq!(report.summary.truncated, 1);
        assert_eq!(report.summary.rejected, 0);

        let truncated = &report.outcomes[1];
        assert!(truncated.was_truncated());
        assert_ne!(
            truncated.original.as_ref().map(|q| q.stem.clone()),
            match &truncated.result {
                PipelineResult::Accepted(q) => Some(q.stem.clone()),
                _ => None,
            }
        );
    }

    #[test]
    fn parse_errors_are_kept() {
        let report = process_batch(&items(), &LimitProfile::lenient(), &AtomicBool::new(false));
        assert_eq!(
            report.outcomes[3].parse_error,
            Some(ParseError::MissingOptionBlock)
        );
        assert_eq!(report.outcomes[3].original, None);
    }

    #[test]
    fn cancelled_batch_skips_everything() {
        let report = process_batch(&items(), &LimitProfile::lenient(), &AtomicBool::new(true));
        assert!(report.outcomes.is_empty());
        assert_eq!(report.summary.skipped, 5);
        assert_eq!(report.summary.valid_percentage, 0.0);
    }

    #[test]
    fn summary_display() {
        let report = process_batch(&items(), &LimitProfile::lenient(), &AtomicBool::new(false));
        let text = report.summary.to_string();
        assert!(text.contains("Accepted:     2 (40.0%), 0 truncated"));
        assert!(text.contains("  TooLong: 1"));
        assert!(!text.contains("Skipped"));
    }
}
