use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use quizpoll_engine::{BatchReport, PipelineResult, to_gift};

/// Where a batch item came from: file and 1-based position within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSource {
    pub file: PathBuf,
    pub number: usize,
}

impl std::fmt::Display for ItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.file.display(), self.number)
    }
}

/// One line per item that was not accepted, then the batch summary.
pub fn write_summary(
    out: &mut impl Write,
    report: &BatchReport,
    sources: &[ItemSource],
) -> Result<()> {
    for outcome in &report.outcomes {
        let source = &sources[outcome.index];
        match &outcome.result {
            PipelineResult::Accepted(_) => {}
            PipelineResult::Rejected(violations) => {
                let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
                writeln!(out, "{source}: rejected: {}", reasons.join("; "))?;
            }
            PipelineResult::ParseFailed(reason) => match &outcome.parse_error {
                Some(error) => writeln!(out, "{source}: parse failed: {error}")?,
                None => writeln!(out, "{source}: parse failed: {reason:?}")?,
            },
        }
    }
    writeln!(out)?;
    writeln!(out, "{}", report.summary)?;
    Ok(())
}

/// One JSON object per processed item.
pub fn write_json(
    out: &mut impl Write,
    report: &BatchReport,
    sources: &[ItemSource],
) -> Result<()> {
    for outcome in &report.outcomes {
        let source = &sources[outcome.index];
        let line = serde_json::json!({
            "file": source.file,
            "item": source.number,
            "outcome": outcome,
        });
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Accepted questions re-exported as GIFT, separated by blank lines.
pub fn write_gift(out: &mut impl Write, report: &BatchReport) -> Result<()> {
    let accepted = report.outcomes.iter().filter_map(|o| match &o.result {
        PipelineResult::Accepted(q) => Some(q),
        _ => None,
    });
    for (i, q) in accepted.enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", to_gift(q))?;
    }
    Ok(())
}
