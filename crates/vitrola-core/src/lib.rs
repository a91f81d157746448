//! Vitrola core - the deterministic jukebox engine
//!
//! Everything here is plain state machines with time and randomness passed
//! in: sprite frame discovery, wandering characters, stage placement, spawn
//! scheduling, the song list, and the playback timeline. The terminal
//! frontend in the `vitrola` crate drives these from its event loop.

pub mod character;
pub mod config;
pub mod error;
pub mod placement;
pub mod session;
pub mod songs;
pub mod spawn;
pub mod sprite;
pub mod timeline;

pub use character::{Character, CharacterId, CharacterKind, WanderState};
pub use config::VitrolaConfig;
pub use error::{SongError, SpriteError};
pub use placement::{find_placement, Placement, StageRect, PLACEMENT_ATTEMPTS};
pub use session::{format_clock, PlaybackSession};
pub use songs::Song;
pub use spawn::{SpawnConfig, SpawnController, SpawnDirective};
pub use sprite::{FrameMap, SheetGeometry, SpriteSheet};
pub use timeline::{active_song_index, SeekOutcome, TimelineController};
