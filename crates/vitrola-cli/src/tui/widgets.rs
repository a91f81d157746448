//! Small chrome widgets - top bar and hint bar

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;
use vitrola_core::session::format_clock;

use super::marquee::Marquee;
use super::theme::Theme;

/// One-row bar with the scrolling title on the left and the timer on the
/// right. Clicking anywhere on it opens the song list.
pub struct TopBar<'a> {
    pub theme: &'a Theme,
    pub marquee: &'a Marquee,
    pub elapsed: Duration,
    pub total: Option<Duration>,
    pub playing: bool,
}

impl TopBar<'_> {
    fn timer_text(&self) -> String {
        let glyph = if self.playing { "\u{25b6}" } else { "\u{25a0}" };
        let total = match self.total {
            Some(total) => format_clock(total),
            None => "--:--".to_string(),
        };
        format!(" {glyph} {} / {} ", format_clock(self.elapsed), total)
    }
}

impl Widget for TopBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.bg_color));

        let timer = self.timer_text();
        let timer_width = timer.width() as u16;
        let marquee_width = area.width.saturating_sub(timer_width);

        let window = self.marquee.window(usize::from(marquee_width));
        buf.set_string(
            area.x,
            area.y,
            window,
            Style::default()
                .fg(self.theme.marquee_color)
                .add_modifier(Modifier::BOLD),
        );

        if timer_width <= area.width {
            buf.set_string(
                area.x + marquee_width,
                area.y,
                timer,
                Style::default().fg(self.theme.timer_color),
            );
        }
    }
}

/// Key binding hints.
pub struct HintBar<'a> {
    pub theme: &'a Theme,
}

impl Widget for HintBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.bg_color));

        let bindings = [
            ("Space", "play/pause"),
            ("l", "songs"),
            ("\u{2190}/\u{2192}", "prev/next"),
            ("q", "quit"),
        ];

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    " \u{2502} ",
                    Style::default().fg(self.theme.dim_color),
                ));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(self.theme.accent_color)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(self.theme.dim_color),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
