//! Asset discovery and background loading
//!
//! Assets live in one directory: `sprite.png`, `songs.txt` and a
//! `track.*` audio file. Sprite and songs are decoded off the event loop
//! and delivered over a channel; each missing piece degrades on its own.

use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use vitrola_core::error::{SongError, SpriteError};
use vitrola_core::songs::{self, Song};
use vitrola_core::sprite::{FrameMap, SheetGeometry, SpriteSheet};

const SPRITE_FILE: &str = "sprite.png";
const SONGS_FILE: &str = "songs.txt";
const TRACK_STEM: &str = "track";
const TRACK_EXTENSIONS: [&str; 4] = ["ogg", "mp3", "wav", "flac"];

/// Resolved asset locations.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub sprite: PathBuf,
    pub songs: PathBuf,
    pub audio: Option<PathBuf>,
}

impl AssetPaths {
    /// Point into `dir`, probing the known audio extensions.
    pub fn locate(dir: &Path) -> Self {
        let audio = TRACK_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{TRACK_STEM}.{ext}")))
            .find(|candidate| candidate.is_file());

        Self {
            sprite: dir.join(SPRITE_FILE),
            songs: dir.join(SONGS_FILE),
            audio,
        }
    }
}

/// Results arriving from the loader task.
pub enum AssetEvent {
    Sprite(Result<(SpriteSheet, FrameMap), SpriteError>),
    Songs(Result<Vec<Song>, SongError>),
}

/// Load sprite and songs on the blocking pool; results arrive on the
/// returned channel in completion order.
pub fn spawn_loader(paths: AssetPaths, geometry: SheetGeometry) -> UnboundedReceiver<AssetEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let sprite = SpriteSheet::load(&paths.sprite, geometry)
            .and_then(|sheet| FrameMap::scan(&sheet).map(|frames| (sheet, frames)));
        let _ = tx.send(AssetEvent::Sprite(sprite));

        let songs = songs::load_song_list(&paths.songs);
        let _ = tx.send(AssetEvent::Songs(songs));
    });

    rx
}
