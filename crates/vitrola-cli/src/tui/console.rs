//! Diagnostics console line
//!
//! Asset and audio problems surface here instead of crashing the app. The
//! last few entries are kept; the newest one is shown on the bottom line
//! and everything also goes to tracing.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::collections::VecDeque;

use super::theme::Theme;

const KEPT_ENTRIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct ConsoleEntry {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Console {
    entries: VecDeque<ConsoleEntry>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.push(Severity::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.push(Severity::Warning, message);
    }

    pub fn latest(&self) -> Option<&ConsoleEntry> {
        self.entries.back()
    }

    fn push(&mut self, severity: Severity, message: String) {
        self.entries.push_back(ConsoleEntry { severity, message });
        while self.entries.len() > KEPT_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        if area.height == 0 {
            return;
        }

        let line = match self.latest() {
            Some(entry) => {
                let (marker, color) = match entry.severity {
                    Severity::Info => ("\u{00b7} ", theme.dim_color),
                    Severity::Warning => ("\u{26a0} ", theme.warning_color),
                };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(color)),
                    Span::styled(entry.message.clone(), Style::default().fg(color)),
                ])
            }
            None => Line::default(),
        };

        let paragraph = Paragraph::new(line).style(Style::default().bg(theme.bg_color));
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_wins() {
        let mut console = Console::new();
        assert!(console.latest().is_none());

        console.info("songs loaded");
        console.warn("no audio device");
        let latest = console.latest().unwrap();
        assert_eq!(latest.severity, Severity::Warning);
        assert_eq!(latest.message, "no audio device");
    }

    #[test]
    fn test_old_entries_are_dropped() {
        let mut console = Console::new();
        for i in 0..20 {
            console.info(format!("entry {i}"));
        }
        assert_eq!(console.entries.len(), KEPT_ENTRIES);
        assert_eq!(console.latest().unwrap().message, "entry 19");
    }
}
