//! Playback session state
//!
//! One value holds everything the UI needs to describe playback. Only the
//! timeline controller mutates it; everyone else reads.

use std::time::Duration;

/// Snapshot of the current playback session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSession {
    pub(crate) playing: bool,
    pub(crate) elapsed: Duration,
    pub(crate) total: Option<Duration>,
    pub(crate) current_song: Option<usize>,
}

impl PlaybackSession {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Seconds of track consumed so far. Monotonic while playing; only an
    /// explicit seek moves it backwards.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Track length, once known.
    pub fn total(&self) -> Option<Duration> {
        self.total
    }

    /// Index into the song list of the song under the playhead.
    pub fn current_song(&self) -> Option<usize> {
        self.current_song
    }
}

/// `M:SS` with unpadded minutes, e.g. `4:05` or `74:03`.
pub fn format_clock(d: Duration) -> String {
    let total = d.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
