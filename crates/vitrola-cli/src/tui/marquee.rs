//! Scrolling song title marquee
//!
//! The current title repeats endlessly with a separator and drifts one
//! column per step. Width accounting goes through unicode-width so wide
//! glyphs fill the window correctly.

use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthChar;

const SEPARATOR: &str = "   \u{00b7}   ";

#[derive(Debug)]
pub struct Marquee {
    text: Option<String>,
    offset: usize,
    step_every: Duration,
    last_step: Instant,
}

impl Marquee {
    pub fn new(now: Instant) -> Self {
        Self {
            text: None,
            offset: 0,
            step_every: Duration::from_millis(200),
            last_step: now,
        }
    }

    /// Swap the displayed title. A changed title restarts the scroll.
    pub fn set_text(&mut self, text: Option<String>) {
        if self.text != text {
            self.text = text;
            self.offset = 0;
        }
    }

    pub fn clear(&mut self) {
        self.set_text(None);
    }

    /// Scroll by one column when the step interval has elapsed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.text.is_none() || now.duration_since(self.last_step) < self.step_every {
            return false;
        }
        self.offset = self.offset.wrapping_add(1);
        self.last_step = now;
        true
    }

    /// The visible slice, exactly `width` columns (padded with spaces).
    pub fn window(&self, width: usize) -> String {
        let Some(text) = self.text.as_deref() else {
            return " ".repeat(width);
        };
        if width == 0 || text.is_empty() {
            return " ".repeat(width);
        }

        let cycle: Vec<char> = text.chars().chain(SEPARATOR.chars()).collect();
        let mut out = String::with_capacity(width);
        let mut used = 0;
        let mut index = self.offset % cycle.len();

        while used < width {
            let c = cycle[index];
            let w = UnicodeWidthChar::width(c).unwrap_or(1).max(1);
            if used + w > width {
                // A wide glyph straddling the edge becomes padding.
                out.push(' ');
                used += 1;
            } else {
                out.push(c);
                used += w;
            }
            index = (index + 1) % cycle.len();
        }

        out
    }
}
