//! Engine error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or scanning a sprite sheet
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("failed to read sprite sheet {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "sprite sheet is {width}x{height}px but a {columns}x{rows} grid of \
         {cell_width}x{cell_height}px cells needs {needed_width}x{needed_height}px"
    )]
    GeometryMismatch {
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
        cell_width: u32,
        cell_height: u32,
        needed_width: u32,
        needed_height: u32,
    },

    /// Every cell in the sheet was blank, so there is nothing to animate.
    #[error("no animation frames detected in sprite sheet")]
    NoAnimationData,
}

/// Errors produced while loading the song list
#[derive(Debug, Error)]
pub enum SongError {
    #[error("failed to read song list {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
