/// `::title::` delimiter.
pub struct TitleDelimiter;

impl TitleDelimiter {
    pub const MARK: &'static str = "::";
}

/// `{ ... }` answer block delimiters.
pub struct OptionBlock;

impl OptionBlock {
    pub const OPEN: &'static str = "{";
    pub const CLOSE: &'static str = "}";
}

/// Lines that carry no question content.
pub struct Directive;

impl Directive {
    pub const COMMENT: &'static str = "//";
    pub const CATEGORY: &'static str = "$CATEGORY:";

    pub fn matches(trimmed: &str) -> bool {
        trimmed.starts_with(Self::COMMENT) || trimmed.starts_with(Self::CATEGORY)
    }
}

/// Bare general-feedback marker. The option lexer owns label recognition; the
/// extractor only needs to know a feedback section has started.
pub struct FeedbackMark;

impl FeedbackMark {
    pub const MARK: &'static str = "####";
}
