//! Frame discovery
//!
//! A single pass over the sheet classifies every cell. A cell is blank when
//! all of its pixels with alpha > 0 share one identical RGBA value (fully
//! transparent cells and solid filler cells alike); anything else is a
//! usable animation frame. Valid frames are grouped by sheet row, in
//! left-to-right order.

use crate::error::SpriteError;
use crate::sprite::SpriteSheet;
use image::RgbaImage;
use std::collections::BTreeMap;

/// Valid animation frames grouped by sheet row. Rows with no valid frames
/// are absent; the map itself is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMap {
    rows: BTreeMap<u32, Vec<u32>>,
}

impl FrameMap {
    /// Scan a sheet and build the map. Errors with
    /// [`SpriteError::NoAnimationData`] when every cell is blank.
    pub fn scan(sheet: &SpriteSheet) -> Result<Self, SpriteError> {
        let geometry = sheet.geometry();
        let image = sheet.image();
        let mut rows: BTreeMap<u32, Vec<u32>> = BTreeMap::new();

        for row in 0..geometry.rows {
            for column in 0..geometry.columns {
                let frame = row * geometry.columns + column;
                let (x, y, w, h) = geometry.source_rect(frame);
                if !cell_is_blank(image, x, y, w, h) {
                    rows.entry(row).or_default().push(frame);
                }
            }
        }

        tracing::debug!(
            rows = rows.len(),
            frames = rows.values().map(Vec::len).sum::<usize>(),
            "scanned sprite sheet"
        );

        Self::from_rows(rows)
    }

    /// Build a map from pre-known row data, dropping empty rows. Errors
    /// when nothing remains.
    pub fn from_rows(rows: impl IntoIterator<Item = (u32, Vec<u32>)>) -> Result<Self, SpriteError> {
        let rows: BTreeMap<u32, Vec<u32>> = rows
            .into_iter()
            .filter(|(_, frames)| !frames.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(SpriteError::NoAnimationData);
        }
        Ok(Self { rows })
    }

    /// Rows that contain at least one valid frame, in sheet order.
    pub fn row_ids(&self) -> Vec<u32> {
        self.rows.keys().copied().collect()
    }

    /// Valid frames of one row, left to right.
    pub fn row_frames(&self, row: u32) -> Option<&[u32]> {
        self.rows.get(&row).map(Vec::as_slice)
    }

    pub fn frame_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    /// Whether `frame` was classified as a valid animation frame.
    pub fn contains_frame(&self, frame: u32) -> bool {
        self.rows.values().any(|frames| frames.contains(&frame))
    }
}

fn cell_is_blank(image: &RgbaImage, x0: u32, y0: u32, width: u32, height: u32) -> bool {
    let mut first: Option<[u8; 4]> = None;

    for y in y0..y0 + height {
        for x in x0..x0 + width {
            let pixel = image.get_pixel(x, y).0;
            if pixel[3] == 0 {
                continue;
            }
            match first {
                None => first = Some(pixel),
                Some(seen) if seen != pixel => return false,
                Some(_) => {}
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::SheetGeometry;
    use image::Rgba;

    const CELL: u32 = 4;

    fn geometry(columns: u32, rows: u32) -> SheetGeometry {
        SheetGeometry {
            cell_width: CELL,
            cell_height: CELL,
            columns,
            rows,
        }
    }

    /// Build a sheet where each listed cell gets a two-color pattern and
    /// everything else stays transparent.
    fn sheet_with_sprites(columns: u32, rows: u32, sprites: &[(u32, u32)]) -> SpriteSheet {
        let image = RgbaImage::from_fn(columns * CELL, rows * CELL, |x, y| {
            let cell = (x / CELL, y / CELL);
            if sprites.contains(&cell) {
                if (x + y) % 2 == 0 {
                    Rgba([200, 40, 40, 255])
                } else {
                    Rgba([40, 40, 200, 255])
                }
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        SpriteSheet::from_image(image, geometry(columns, rows)).unwrap()
    }

    #[test]
    fn test_rows_group_frames_in_order() {
        // Row 0: columns 0 and 2; row 2: column 1; row 1 stays blank.
        let sheet = sheet_with_sprites(3, 3, &[(0, 0), (2, 0), (1, 2)]);
        let map = FrameMap::scan(&sheet).unwrap();

        assert_eq!(map.row_ids(), vec![0, 2]);
        assert_eq!(map.row_frames(0), Some(&[0, 2][..]));
        assert_eq!(map.row_frames(2), Some(&[7][..]));
        assert_eq!(map.row_frames(1), None);
        assert_eq!(map.frame_count(), 3);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let sheet = sheet_with_sprites(4, 2, &[(0, 0), (3, 0), (1, 1), (2, 1)]);
        let a = FrameMap::scan(&sheet).unwrap();
        let b = FrameMap::scan(&sheet).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_uniform_opaque_cell_is_blank() {
        let image = RgbaImage::from_pixel(2 * CELL, CELL, Rgba([10, 20, 30, 255]));
        let sheet = SpriteSheet::from_image(image, geometry(2, 1)).unwrap();
        assert!(matches!(
            FrameMap::scan(&sheet),
            Err(SpriteError::NoAnimationData)
        ));
    }

    #[test]
    fn test_transparent_pixels_are_ignored() {
        // One opaque color plus scattered transparency is still blank.
        let image = RgbaImage::from_fn(CELL, CELL, |x, _| {
            if x % 2 == 0 {
                Rgba([10, 20, 30, 255])
            } else {
                Rgba([99, 99, 99, 0])
            }
        });
        let sheet = SpriteSheet::from_image(image, geometry(1, 1)).unwrap();
        assert!(matches!(
            FrameMap::scan(&sheet),
            Err(SpriteError::NoAnimationData)
        ));
    }

    #[test]
    fn test_alpha_variation_counts_as_sprite() {
        // Same RGB at two different non-zero alphas is a real frame.
        let image = RgbaImage::from_fn(CELL, CELL, |x, _| {
            if x % 2 == 0 {
                Rgba([10, 20, 30, 255])
            } else {
                Rgba([10, 20, 30, 128])
            }
        });
        let sheet = SpriteSheet::from_image(image, geometry(1, 1)).unwrap();
        let map = FrameMap::scan(&sheet).unwrap();
        assert_eq!(map.row_frames(0), Some(&[0][..]));
    }

    #[test]
    fn test_single_opaque_pixel_is_blank() {
        let mut image = RgbaImage::from_pixel(CELL, CELL, Rgba([0, 0, 0, 0]));
        image.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let sheet = SpriteSheet::from_image(image, geometry(1, 1)).unwrap();
        assert!(matches!(
            FrameMap::scan(&sheet),
            Err(SpriteError::NoAnimationData)
        ));
    }

    #[test]
    fn test_from_rows_drops_empty_rows() {
        let map = FrameMap::from_rows([(0, vec![0, 1]), (1, Vec::new())]).unwrap();
        assert_eq!(map.row_ids(), vec![0]);
        assert!(map.contains_frame(1));
        assert!(!map.contains_frame(5));
    }

    #[test]
    fn test_from_rows_rejects_empty_map() {
        assert!(matches!(
            FrameMap::from_rows(Vec::<(u32, Vec<u32>)>::new()),
            Err(SpriteError::NoAnimationData)
        ));
    }
}
