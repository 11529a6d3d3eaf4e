//! # Segment Extraction
//!
//! Splits one decoded GIFT-like item into title, stem and raw option block.
//!
//! 1. **Line Classification** (`classify`): each line is classified on its own
//!    (blank, directive, position of `::` and `{`).
//! 2. **Segment Construction** (`builder`): a `SegmentBuilder` walks the lines
//!    through `AwaitingStem` → `InOptionsBlock` → `Done`.
//!
//! Input must keep its line breaks ([`DecodeMode::Structural`]), since title and
//! stem heuristics are line based.
//!
//! [`DecodeMode::Structural`]: crate::parsing::decode::DecodeMode::Structural

pub mod builder;
pub mod classify;
pub mod kinds;

pub use builder::{ExtractState, RawSegments, SegmentBuilder};
pub use classify::{GiftLineClassifier, LineClass};

use super::ParseError;

/// Extracts the raw segments of a single item.
pub fn extract(decoded: &str) -> Result<RawSegments, ParseError> {
    let classifier = GiftLineClassifier;
    let mut builder = SegmentBuilder::new();

    for line in decoded.lines() {
        builder.push(&classifier.classify(line));
        if builder.state() == ExtractState::Done {
            break;
        }
    }

    builder.finish()
}
