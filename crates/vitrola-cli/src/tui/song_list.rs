//! Song list popup
//!
//! Scrollable list of the parsed songs. Enter or a mouse click seeks to
//! the chosen song's start.

use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;
use vitrola_core::session::format_clock;
use vitrola_core::songs::Song;

use super::layout::PopupLayout;
use super::theme::Theme;

/// Song list popup state
#[derive(Debug, Default)]
pub struct SongListPopup {
    pub is_open: bool,
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl SongListPopup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with the selection on the song currently playing.
    pub fn open(&mut self, current: Option<usize>, visible_height: usize) {
        self.is_open = true;
        self.selected_index = current.unwrap_or(0);
        self.scroll_offset = 0;
        self.ensure_visible(visible_height);
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn next(&mut self, len: usize, visible_height: usize) {
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
            self.ensure_visible(visible_height);
        }
    }

    pub fn prev(&mut self, visible_height: usize) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.ensure_visible(visible_height);
        }
    }

    fn ensure_visible(&mut self, visible_height: usize) {
        let visible_height = visible_height.max(1);
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Map a click inside the list area to a song index.
    pub fn song_at(&self, layout: &PopupLayout, column: u16, row: u16, len: usize) -> Option<usize> {
        let list = layout.list;
        if column < list.x
            || column >= list.x + list.width
            || row < list.y
            || row >= list.y + list.height
        {
            return None;
        }
        let index = self.scroll_offset + usize::from(row - list.y);
        (index < len).then_some(index)
    }

    pub fn render(
        &self,
        f: &mut Frame,
        theme: &Theme,
        songs: &[Song],
        current: Option<usize>,
        layout: &PopupLayout,
    ) {
        let frame_area = layout.frame;
        if frame_area.width == 0 || frame_area.height == 0 {
            return;
        }

        f.render_widget(Clear, frame_area);
        let block = Block::default()
            .title(" Songs ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_color))
            .style(Style::default().bg(theme.bg_color));
        f.render_widget(block, frame_area);

        let list = layout.list;
        let visible_height = usize::from(list.height);
        let mut lines: Vec<Line> = Vec::new();

        if songs.is_empty() {
            lines.push(Line::from(Span::styled(
                "  no songs loaded",
                Style::default().fg(theme.dim_color),
            )));
        }

        for (index, song) in songs
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height)
        {
            let is_selected = index == self.selected_index;
            let is_current = current == Some(index);

            let prefix = if is_selected { " \u{203a} " } else { "   " };
            let note = if is_current { "\u{266a} " } else { "  " };

            let style = if is_selected {
                Style::default()
                    .fg(theme.selection_fg_color)
                    .bg(theme.selection_bg_color)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(theme.accent_color)
            } else {
                Style::default().fg(theme.text_color)
            };

            // Prefix and note are 5 columns, the clock column is 11, plus a
            // space of margin.
            let title_width = usize::from(list.width).saturating_sub(17);
            let clock = format!(
                "{:>5}-{:>5}",
                format_clock(song.start_position()),
                format_clock(song.end_position())
            );

            lines.push(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(note, style),
                Span::styled(fit_columns(&song.title, title_width), style),
                Span::styled(clock, style.add_modifier(Modifier::DIM)),
            ]));
        }

        f.render_widget(Paragraph::new(lines), list);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled(
                "\u{2191}/\u{2193}",
                Style::default()
                    .fg(theme.accent_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": navigate  ", Style::default().fg(theme.text_color)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(theme.accent_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": play  ", Style::default().fg(theme.text_color)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(theme.accent_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": close", Style::default().fg(theme.text_color)),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(footer, layout.footer);
    }
}

/// Truncate or pad `text` to exactly `width` display columns. A wide
/// glyph that would straddle the edge is dropped in favor of padding.
fn fit_columns(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(1).max(1);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    while used < width {
        out.push(' ');
        used += 1;
    }
    out
}
