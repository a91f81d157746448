//! Screen layout
//!
//! The screen splits into a one-row top bar (marquee + timer), the stage,
//! a hint bar and a diagnostics line. The stage is also addressed in stage
//! pixels for sprite placement: one terminal cell is one pixel wide and
//! two pixels tall. Layout is recomputed every frame and kept around for
//! mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use vitrola_core::placement::StageRect;

/// Stage pixels kept clear below the top edge of the stage.
pub const STAGE_TOP_MARGIN: u32 = 2;

/// Rectangles of the song list popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopupLayout {
    /// Outer popup including the border
    pub frame: Rect,
    /// Rows that show songs
    pub list: Rect,
    /// Key hint row at the bottom
    pub footer: Rect,
}

/// Where everything goes this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub top_bar: Rect,
    pub stage: Rect,
    pub hint_bar: Rect,
    pub console: Rect,
    pub popup: Option<PopupLayout>,
}

impl ScreenLayout {
    /// Split `area`; `popup_rows` sizes the song list popup when it is open.
    pub fn compute(area: Rect, popup_rows: Option<usize>) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            top_bar: chunks[0],
            stage: chunks[1],
            hint_bar: chunks[2],
            console: chunks[3],
            popup: popup_rows.map(|rows| popup_layout(area, rows)),
        }
    }

    /// The stage in stage pixels, origin at its own top-left.
    pub fn stage_viewport(&self) -> StageRect {
        StageRect::new(0, 0, u32::from(self.stage.width), u32::from(self.stage.height) * 2)
    }

    /// Map a terminal cell to the top stage pixel it covers, if it lies on
    /// the stage.
    pub fn cell_to_stage(&self, column: u16, row: u16) -> Option<(u32, u32)> {
        let stage = self.stage;
        if column < stage.x
            || column >= stage.x + stage.width
            || row < stage.y
            || row >= stage.y + stage.height
        {
            return None;
        }
        Some((
            u32::from(column - stage.x),
            u32::from(row - stage.y) * 2,
        ))
    }

    /// Screen regions that sprite placement must keep clear, expressed in
    /// stage pixels. The popup is the only chrome that overlaps the stage.
    pub fn stage_exclusions(&self) -> Vec<StageRect> {
        let mut zones = Vec::new();
        if let Some(popup) = self.popup {
            if let Some(rect) = self.overlap_in_stage_pixels(popup.frame) {
                zones.push(rect);
            }
        }
        zones
    }

    fn overlap_in_stage_pixels(&self, rect: Rect) -> Option<StageRect> {
        let overlap = rect.intersection(self.stage);
        if overlap.width == 0 || overlap.height == 0 {
            return None;
        }
        Some(StageRect::new(
            u32::from(overlap.x - self.stage.x),
            u32::from(overlap.y - self.stage.y) * 2,
            u32::from(overlap.width),
            u32::from(overlap.height) * 2,
        ))
    }
}

fn popup_layout(area: Rect, rows: usize) -> PopupLayout {
    // Border rows plus the footer.
    let wanted_height = rows as u16 + 3;
    let width = area.width.saturating_sub(4).min(48).max(area.width.min(20));
    let height = wanted_height.min(area.height.saturating_sub(2)).max(area.height.min(5));

    let frame = center_rect(width, height, area);
    let inner = Rect {
        x: frame.x.saturating_add(1),
        y: frame.y.saturating_add(1),
        width: frame.width.saturating_sub(2),
        height: frame.height.saturating_sub(2),
    };
    let footer_height = 1.min(inner.height);
    let list = Rect {
        height: inner.height - footer_height,
        ..inner
    };
    let footer = Rect {
        y: inner.y + list.height,
        height: footer_height,
        ..inner
    };

    PopupLayout { frame, list, footer }
}

/// A `width` x `height` rect centered in `area`, clamped to it.
pub fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
