use crate::parsing::escape::find_unescaped;

use super::kinds::{Directive, OptionBlock, TitleDelimiter};

/// Local facts about a single line, computed without surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClass<'a> {
    /// The line without its terminator.
    pub text: &'a str,
    pub is_blank: bool,
    /// `//` comment or `$CATEGORY:` directive.
    pub is_directive: bool,
    /// Byte offset of the first unescaped `::`.
    pub title_mark: Option<usize>,
    /// Byte offset of the first unescaped `{`.
    pub open_brace: Option<usize>,
}

impl LineClass<'_> {
    /// A `::` that comes before any `{` on the line.
    pub fn has_leading_title_mark(&self) -> bool {
        match (self.title_mark, self.open_brace) {
            (Some(mark), Some(brace)) => mark < brace,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

/// Classifies lines for the segment extractor.
pub struct GiftLineClassifier;

impl GiftLineClassifier {
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let text = line.trim_end_matches(['\r', '\n']);
        let trimmed = text.trim();

        LineClass {
            text,
            is_blank: trimmed.is_empty(),
            is_directive: Directive::matches(trimmed),
            title_mark: find_unescaped(text, TitleDelimiter::MARK),
            open_brace: find_unescaped(text, OptionBlock::OPEN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_stem_line() {
        let c = GiftLineClassifier.classify("¿Capital de Francia?");
        assert!(!c.is_blank);
        assert!(!c.is_directive);
        assert_eq!(c.title_mark, None);
        assert_eq!(c.open_brace, None);
    }

    #[test]
    fn title_before_brace() {
        let c = GiftLineClassifier.classify("::T1::Stem {=a ~b}");
        assert_eq!(c.title_mark, Some(0));
        assert!(c.has_leading_title_mark());
    }

    #[test]
    fn double_colon_inside_block_is_not_a_title() {
        let c = GiftLineClassifier.classify("Stem {=a::b ~c}");
        assert!(!c.has_leading_title_mark());
    }

    #[test]
    fn escaped_brace_is_not_an_opener() {
        let c = GiftLineClassifier.classify(r"Conjunto \{1, 2\}");
        assert_eq!(c.open_brace, None);
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert!(GiftLineClassifier.classify(" \t\r").is_blank);
    }
}
