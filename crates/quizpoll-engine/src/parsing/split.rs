//! Splitting a multi-question GIFT file into one raw item per question.

use super::{
    escape::is_escaped,
    segments::kinds::{Directive, OptionBlock},
};

const QUESTION_COMMENT: &str = "// question:";

#[derive(Default)]
struct ItemBuffer {
    lines: Vec<String>,
    /// Unescaped `{` minus `}` seen so far, never negative.
    depth: usize,
    has_block: bool,
}

impl ItemBuffer {
    fn push(&mut self, line: &str) {
        for (i, b) in line.bytes().enumerate() {
            if is_escaped(line, i) {
                continue;
            }
            if b == OptionBlock::OPEN.as_bytes()[0] {
                self.depth += 1;
                self.has_block = true;
            } else if b == OptionBlock::CLOSE.as_bytes()[0] {
                self.depth = self.depth.saturating_sub(1);
            }
        }
        self.lines.push(line.to_string());
    }

    fn flush(&mut self, items: &mut Vec<String>) {
        let buffer = std::mem::take(self);
        let only_directives = buffer
            .lines
            .iter()
            .map(|l| l.trim())
            .all(|l| l.is_empty() || Directive::matches(l));
        if !only_directives {
            items.push(buffer.lines.join("\n").trim().to_string());
        }
    }
}

/// Splits `text` into raw items. A blank line ends an item once it has an
/// option block and no brace is left open; `// question:` always starts a new
/// item. `$CATEGORY:` lines outside a block are dropped.
pub fn split_items(text: &str) -> Vec<String> {
    let mut items = vec![];
    let mut buffer = ItemBuffer::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if buffer.depth == 0 {
            if trimmed.starts_with(Directive::CATEGORY) {
                continue;
            }
            if trimmed.starts_with(QUESTION_COMMENT) {
                buffer.flush(&mut items);
                continue;
            }
            if trimmed.is_empty() && buffer.has_block {
                buffer.flush(&mut items);
                continue;
            }
        }
        buffer.push(line);
    }
    buffer.flush(&mut items);

    items
}
