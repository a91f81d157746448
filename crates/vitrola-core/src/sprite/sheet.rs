//! Sprite sheet image and grid geometry

use crate::error::SpriteError;
use image::RgbaImage;
use std::path::Path;

/// Fixed grid layout of a sprite sheet. Frames are numbered row-major,
/// left to right then top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGeometry {
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl SheetGeometry {
    pub fn frame_count(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn row_of(&self, frame: u32) -> u32 {
        frame / self.columns.max(1)
    }

    pub fn column_of(&self, frame: u32) -> u32 {
        frame % self.columns.max(1)
    }

    /// Pixel rectangle (x, y, width, height) of a frame within the sheet.
    pub fn source_rect(&self, frame: u32) -> (u32, u32, u32, u32) {
        (
            self.column_of(frame) * self.cell_width,
            self.row_of(frame) * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }

    /// On-stage size of one frame after scaling, at least 1x1.
    pub fn scaled_size(&self, scale: f32) -> (u32, u32) {
        let w = (self.cell_width as f32 * scale).round().max(1.0) as u32;
        let h = (self.cell_height as f32 * scale).round().max(1.0) as u32;
        (w, h)
    }
}

/// A decoded sprite sheet together with its grid geometry.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: RgbaImage,
    geometry: SheetGeometry,
}

impl SpriteSheet {
    /// Decode a sheet from disk and validate it against `geometry`.
    pub fn load(path: &Path, geometry: SheetGeometry) -> Result<Self, SpriteError> {
        let image = image::open(path)
            .map_err(|source| SpriteError::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Self::from_image(image, geometry)
    }

    /// Wrap an already decoded image, validating its dimensions.
    pub fn from_image(image: RgbaImage, geometry: SheetGeometry) -> Result<Self, SpriteError> {
        let (width, height) = image.dimensions();
        let needed_width = geometry.columns * geometry.cell_width;
        let needed_height = geometry.rows * geometry.cell_height;

        if width < needed_width || height < needed_height || geometry.frame_count() == 0 {
            return Err(SpriteError::GeometryMismatch {
                width,
                height,
                columns: geometry.columns,
                rows: geometry.rows,
                cell_width: geometry.cell_width,
                cell_height: geometry.cell_height,
                needed_width,
                needed_height,
            });
        }

        Ok(Self { image, geometry })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn geometry(&self) -> SheetGeometry {
        self.geometry
    }
}
