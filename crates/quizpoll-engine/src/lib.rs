pub mod export;
pub mod io;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use export::to_gift;
pub use io::*;
pub use models::*;
pub use parsing::{ParseError, ParseFailure, StructuredRecord, split_items};
pub use pipeline::{
    BatchReport, BatchSummary, ItemOutcome, PipelineResult, RawInput, process, process_batch,
};
pub use validation::{normalize, validate};
