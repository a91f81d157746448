//! Half-block pixel surface
//!
//! Sprites are drawn into a sparse pixel grid twice as tall as the stage
//! area, then flushed to the terminal with '▀'/'▄' cells whose foreground
//! and background carry the top and bottom pixel colors. Unset pixels show
//! the stage background.

use image::RgbaImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

const UPPER_HALF: char = '\u{2580}';
const LOWER_HALF: char = '\u{2584}';

type Rgb = (u8, u8, u8);

/// Sparse RGB pixel grid; `None` is transparent.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgb>>,
}

impl PixelSurface {
    /// Surface covering `columns` x `rows` terminal cells.
    pub fn new(columns: u16, rows: u16) -> Self {
        let width = u32::from(columns);
        let height = u32::from(rows) * 2;
        Self {
            width,
            height,
            pixels: vec![None; (width * height) as usize],
        }
    }

    pub fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize] = Some(color);
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Nearest-neighbor blit of `src` (x, y, width, height in sheet pixels)
    /// scaled into a `dst_width` x `dst_height` box at (`dst_x`, `dst_y`).
    /// Pixels with zero alpha stay transparent.
    pub fn blit_scaled(
        &mut self,
        image: &RgbaImage,
        src: (u32, u32, u32, u32),
        dst_x: i64,
        dst_y: i64,
        dst_width: u32,
        dst_height: u32,
    ) {
        let (sx, sy, sw, sh) = src;
        if sw == 0 || sh == 0 || dst_width == 0 || dst_height == 0 {
            return;
        }

        for dy in 0..dst_height {
            for dx in 0..dst_width {
                let px = sx + dx * sw / dst_width;
                let py = sy + dy * sh / dst_height;
                if px >= image.width() || py >= image.height() {
                    continue;
                }
                let [r, g, b, a] = image.get_pixel(px, py).0;
                if a == 0 {
                    continue;
                }
                self.set(dst_x + i64::from(dx), dst_y + i64::from(dy), (r, g, b));
            }
        }
    }

    /// Flush to the terminal buffer. Cells that two set pixels share become
    /// '▀' with both colors; lone pixels blend against `bg`.
    pub fn render(&self, buf: &mut Buffer, area: Rect, bg: Color) {
        let rows = u32::from(area.height).min(self.height / 2);
        let columns = u32::from(area.width).min(self.width);

        for row in 0..rows {
            for column in 0..columns {
                let top = self.get(column, row * 2);
                let bottom = self.get(column, row * 2 + 1);
                let cell = &mut buf[(area.x + column as u16, area.y + row as u16)];

                match (top, bottom) {
                    (None, None) => {
                        cell.set_char(' ');
                        cell.set_bg(bg);
                    }
                    (Some(t), Some(b)) => {
                        cell.set_char(UPPER_HALF);
                        cell.set_fg(rgb(t));
                        cell.set_bg(rgb(b));
                    }
                    (Some(t), None) => {
                        cell.set_char(UPPER_HALF);
                        cell.set_fg(rgb(t));
                        cell.set_bg(bg);
                    }
                    (None, Some(b)) => {
                        cell.set_char(LOWER_HALF);
                        cell.set_fg(rgb(b));
                        cell.set_bg(bg);
                    }
                }
            }
        }
    }
}

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}
