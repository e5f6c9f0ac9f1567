//! Character-by-character dialog reveal
//!
//! A reveal is a plain owned value driven by the host clock through
//! [`TypingReveal::tick`]. Cancelling and completing happen together in
//! [`TypingReveal::finish`], so no tick can land between the two.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct TypingReveal {
    text: String,
    /// Byte offset after each character, so prefixes stay on char boundaries
    boundaries: Vec<usize>,
    interval: Duration,
    elapsed: Duration,
    shown: usize,
}

impl TypingReveal {
    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(offset, c)| offset + c.len_utf8())
            .collect();
        Self {
            text,
            boundaries,
            interval,
            elapsed: Duration::ZERO,
            shown: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Currently revealed prefix
    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    pub fn char_count(&self) -> usize {
        self.boundaries.len()
    }

    pub fn shown_chars(&self) -> usize {
        self.shown
    }

    pub fn is_complete(&self) -> bool {
        self.shown >= self.boundaries.len()
    }

    /// Advance the reveal clock. Returns true when more text became visible.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.is_complete() {
            return false;
        }
        self.elapsed += elapsed;
        let due = if self.interval.is_zero() {
            self.char_count()
        } else {
            (self.elapsed.as_nanos() / self.interval.as_nanos()) as usize
        };
        let due = due.min(self.char_count());
        if due > self.shown {
            self.shown = due;
            true
        } else {
            false
        }
    }

    /// Stop the reveal and return the full text
    pub fn finish(self) -> String {
        self.text
    }
}
