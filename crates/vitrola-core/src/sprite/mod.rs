//! Sprite sheet loading and frame discovery

mod frames;
mod sheet;

pub use frames::FrameMap;
pub use sheet::{SheetGeometry, SpriteSheet};
