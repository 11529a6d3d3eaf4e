use crate::parsing::{
    ParseError,
    escape::{find_unescaped, rfind_unescaped, split_unescaped},
};

use super::{
    classify::LineClass,
    kinds::{FeedbackMark, OptionBlock, TitleDelimiter},
};

/// Where the extractor is within a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    /// Before the `{` that opens the answer block.
    AwaitingStem,
    /// Inside the answer block. After a feedback marker the block ends at the
    /// last `}` of the item rather than the first, since feedback may hold braces.
    InOptionsBlock { feedback_seen: bool },
    /// The block has closed; further lines belong to no segment.
    Done,
}

/// The raw text segments of one GIFT-like item, before option lexing.
///
/// General feedback, when present, is still inside `option_block`; the option
/// lexer isolates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegments {
    pub title: Option<String>,
    pub stem: String,
    pub option_block: String,
}

pub struct SegmentBuilder {
    state: ExtractState,
    seen_content: bool,
    title: Option<String>,
    /// A first line with neither `::` nor `{`. It is a title only if later
    /// lines supply the stem.
    title_candidate: Option<String>,
    stem: Vec<String>,
    block: Vec<String>,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self {
            state: ExtractState::AwaitingStem,
            seen_content: false,
            title: None,
            title_candidate: None,
            stem: vec![],
            block: vec![],
        }
    }

    pub fn state(&self) -> ExtractState {
        self.state
    }

    pub fn push(&mut self, c: &LineClass<'_>) {
        self.state = match self.state {
            ExtractState::AwaitingStem => self.push_before_block(c),
            ExtractState::InOptionsBlock { feedback_seen } => {
                self.push_in_block(c.text, feedback_seen)
            }
            ExtractState::Done => ExtractState::Done,
        };
    }

    pub fn finish(self) -> Result<RawSegments, ParseError> {
        let mut option_block = self.block.join("\n");
        match self.state {
            ExtractState::AwaitingStem => return Err(ParseError::MissingOptionBlock),
            ExtractState::InOptionsBlock {
                feedback_seen: true,
            } => {
                if let Some(close) = rfind_unescaped(&option_block, OptionBlock::CLOSE) {
                    option_block.truncate(close);
                }
            }
            // Closed normally, or never closed: an unclosed block runs to the end.
            ExtractState::InOptionsBlock {
                feedback_seen: false,
            }
            | ExtractState::Done => {}
        }

        let mut title = self.title;
        let mut stem = self.stem.join("\n");
        if let Some(candidate) = self.title_candidate {
            if stem.is_empty() {
                stem = candidate;
            } else if title.is_none() {
                title = Some(candidate);
            } else {
                stem = format!("{candidate}\n{stem}");
            }
        }

        Ok(RawSegments {
            title,
            stem,
            option_block,
        })
    }

    fn push_before_block(&mut self, c: &LineClass<'_>) -> ExtractState {
        if c.is_blank || c.is_directive {
            return ExtractState::AwaitingStem;
        }
        let first = !self.seen_content;
        self.seen_content = true;

        let text = if c.has_leading_title_mark() {
            self.take_title(c)
        } else if first && c.open_brace.is_none() {
            self.title_candidate = Some(c.text.trim().to_string());
            return ExtractState::AwaitingStem;
        } else {
            c.text
        };

        match find_unescaped(text, OptionBlock::OPEN) {
            Some(brace) => {
                self.push_stem(&text[..brace]);
                self.push_in_block(&text[brace + OptionBlock::OPEN.len()..], false)
            }
            None => {
                self.push_stem(text);
                ExtractState::AwaitingStem
            }
        }
    }

    /// Records the first non-empty `::`-delimited part as the title (unless one
    /// is already known) and returns the text after the last `::`.
    fn take_title<'a>(&mut self, c: &LineClass<'a>) -> &'a str {
        let head_end = c.open_brace.unwrap_or(c.text.len());
        let Some(last) = rfind_unescaped(&c.text[..head_end], TitleDelimiter::MARK) else {
            return c.text;
        };
        if self.title.is_none() {
            self.title = split_unescaped(&c.text[..last], TitleDelimiter::MARK)
                .into_iter()
                .map(str::trim)
                .find(|part| !part.is_empty())
                .map(str::to_string);
        }
        &c.text[last + TitleDelimiter::MARK.len()..]
    }

    fn push_stem(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.stem.push(text.to_string());
        }
    }

    fn push_in_block(&mut self, text: &str, feedback_seen: bool) -> ExtractState {
        if feedback_seen {
            self.block.push(text.to_string());
            return ExtractState::InOptionsBlock {
                feedback_seen: true,
            };
        }

        let close = find_unescaped(text, OptionBlock::CLOSE);
        let feedback = find_unescaped(text, FeedbackMark::MARK);
        match (close, feedback) {
            (Some(close), Some(mark)) if mark < close => {
                self.block.push(text.to_string());
                ExtractState::InOptionsBlock {
                    feedback_seen: true,
                }
            }
            (Some(close), _) => {
                self.block.push(text[..close].to_string());
                ExtractState::Done
            }
            (None, Some(_)) => {
                self.block.push(text.to_string());
                ExtractState::InOptionsBlock {
                    feedback_seen: true,
                }
            }
            (None, None) => {
                self.block.push(text.to_string());
                ExtractState::InOptionsBlock {
                    feedback_seen: false,
                }
            }
        }
    }
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
