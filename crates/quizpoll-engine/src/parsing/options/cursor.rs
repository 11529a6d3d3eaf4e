use crate::parsing::escape::ESCAPE;

/// A byte cursor over an option block that steps over GIFT escapes.
///
/// Only ASCII bytes are ever reported as positions, so every offset it returns
/// is a valid `str` boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes, stopping at the end of input.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Moves to the next unescaped byte matching `pred` and returns its offset.
    /// The cursor is left on that byte.
    pub fn seek_unescaped(&mut self, pred: impl Fn(u8) -> bool) -> Option<usize> {
        while let Some(b) = self.peek() {
            if b == ESCAPE as u8 {
                self.bump_n(2);
                continue;
            }
            if pred(b) {
                return Some(self.i);
            }
            self.bump();
        }
        None
    }
}
