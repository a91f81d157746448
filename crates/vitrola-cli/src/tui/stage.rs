//! Stage rendering
//!
//! Every frame the characters are blitted into a pixel surface sized to
//! the stage area and flushed as half-block cells. While stopped, a hint
//! line floats over the middle of the stage.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use vitrola_core::character::Character;
use vitrola_core::sprite::{FrameMap, SpriteSheet};

use super::pixel::PixelSurface;
use super::theme::Theme;

pub fn render_stage(
    f: &mut Frame,
    area: Rect,
    theme: &Theme,
    sprite: Option<(&SpriteSheet, &FrameMap)>,
    characters: &[Character],
    overlay: Option<&str>,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut surface = PixelSurface::new(area.width, area.height);
    if let Some((sheet, frames)) = sprite {
        let geometry = sheet.geometry();
        for character in characters {
            let Some(frame) = character.current_frame(frames) else {
                continue;
            };
            let bounds = character.bounds;
            surface.blit_scaled(
                sheet.image(),
                geometry.source_rect(frame),
                i64::from(bounds.x),
                i64::from(bounds.y),
                bounds.width,
                bounds.height,
            );
        }
    }
    surface.render(f.buffer_mut(), area, theme.stage_bg_color);

    if let Some(text) = overlay {
        let row = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        let hint = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme.dim_color)
                .add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center);
        f.render_widget(hint, row);
    }
}
