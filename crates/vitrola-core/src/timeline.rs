//! Playback timeline
//!
//! The controller owns the Stopped/Playing state machine and the elapsed
//! clock. Elapsed time is wall-clock driven (anchored at the last
//! play/seek) and clamped to the media's reported position, so a stalled
//! decoder can never make the timer run ahead. The first activation of a
//! session starts from zero; pause keeps the position; end of media closes
//! the session so the next play starts fresh.

use crate::session::PlaybackSession;
use crate::songs::Song;
use std::time::{Duration, Instant};

/// The song under the playhead.
///
/// Songs are scanned in list order; an elapsed time past the last song's
/// end maps to the last song, and anything else that matches nothing (time
/// before the first song, or a gap between songs) maps to the first.
pub fn active_song_index(songs: &[Song], elapsed: Duration) -> Option<usize> {
    if songs.is_empty() {
        return None;
    }

    let secs = elapsed.as_secs();
    for (index, song) in songs.iter().enumerate() {
        if secs >= u64::from(song.start) && secs < u64::from(song.end) {
            return Some(index);
        }
    }

    match songs.last() {
        Some(last) if secs >= u64::from(last.end) => Some(songs.len() - 1),
        _ => Some(0),
    }
}

/// Result of a seek request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekOutcome {
    /// Where the media should jump to
    pub position: Duration,
    /// Whether this seek also flipped Stopped into Playing
    pub started: bool,
}

/// Stopped/Playing controller around a [`PlaybackSession`].
#[derive(Debug)]
pub struct TimelineController {
    songs: Vec<Song>,
    session: PlaybackSession,
    /// Set once the session has been activated; cleared when media ends.
    started_once: bool,
    /// Elapsed at the moment of the last play or seek
    anchor_elapsed: Duration,
    /// Wall-clock instant of the last play or seek, while playing
    resumed_at: Option<Instant>,
}

impl TimelineController {
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs,
            session: PlaybackSession::default(),
            started_once: false,
            anchor_elapsed: Duration::ZERO,
            resumed_at: None,
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn is_playing(&self) -> bool {
        self.session.playing
    }

    pub fn has_started(&self) -> bool {
        self.started_once
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.session.current_song.and_then(|i| self.songs.get(i))
    }

    /// Install the song list once it has loaded. Ignored when songs are
    /// already present; the list never changes mid-session.
    pub fn load_songs(&mut self, songs: Vec<Song>) {
        if self.songs.is_empty() {
            self.songs = songs;
            self.session.current_song = active_song_index(&self.songs, self.session.elapsed)
                .filter(|_| self.session.playing);
        }
    }

    pub fn set_total(&mut self, total: Duration) {
        self.session.total = Some(total);
    }

    /// Stopped -> Playing. Returns false when already playing. The very
    /// first activation of a session rewinds elapsed to zero; later
    /// activations resume where pause left off.
    pub fn play(&mut self, now: Instant) -> bool {
        if self.session.playing {
            return false;
        }

        if !self.started_once {
            self.session.elapsed = Duration::ZERO;
            self.started_once = true;
        }
        self.anchor_elapsed = self.session.elapsed;
        self.resumed_at = Some(now);
        self.session.playing = true;
        self.session.current_song = active_song_index(&self.songs, self.session.elapsed);
        tracing::debug!(elapsed = ?self.session.elapsed, "playback started");
        true
    }

    /// Playing -> Stopped, keeping the elapsed position.
    pub fn pause(&mut self, now: Instant) {
        if !self.session.playing {
            return;
        }
        self.session.elapsed = self.wall_elapsed(now);
        self.resumed_at = None;
        self.session.playing = false;
        tracing::debug!(elapsed = ?self.session.elapsed, "playback paused");
    }

    /// Jump to the start of a song, clamped to the media total when known.
    /// Also starts playback when stopped.
    pub fn seek_to_song(&mut self, index: usize, now: Instant) -> Option<SeekOutcome> {
        let song = self.songs.get(index)?;
        let mut position = song.start_position();
        // A song list can outrun the actual track. Keep the clock inside
        // [0, total]; ticks never move it backwards.
        if let Some(total) = self.session.total {
            position = position.min(total);
        }

        let started = !self.session.playing;
        self.session.elapsed = position;
        self.anchor_elapsed = position;
        self.resumed_at = Some(now);
        self.session.playing = true;
        self.started_once = true;
        self.session.current_song = active_song_index(&self.songs, position);
        tracing::debug!(index, ?position, "seeked to song");

        Some(SeekOutcome { position, started })
    }

    /// Periodic bookkeeping while playing: advance the clock and keep the
    /// current song index fresh.
    pub fn tick(&mut self, now: Instant, media_position: Option<Duration>) {
        if !self.session.playing {
            return;
        }

        let mut elapsed = self.wall_elapsed(now);
        if let Some(pos) = media_position {
            elapsed = elapsed.min(pos);
        }
        if let Some(total) = self.session.total {
            elapsed = elapsed.min(total);
        }
        // Only a seek may move the clock backwards.
        self.session.elapsed = elapsed.max(self.session.elapsed);
        self.session.current_song = active_song_index(&self.songs, self.session.elapsed);
    }

    /// The media ran out: close the session. The next play starts a fresh
    /// one from zero.
    pub fn finish(&mut self) {
        if let Some(total) = self.session.total {
            self.session.elapsed = total;
        }
        self.session.playing = false;
        self.session.current_song = None;
        self.resumed_at = None;
        self.started_once = false;
        tracing::debug!("playback finished");
    }

    fn wall_elapsed(&self, now: Instant) -> Duration {
        match self.resumed_at {
            Some(at) => self.anchor_elapsed + now.saturating_duration_since(at),
            None => self.session.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_songs() -> Vec<Song> {
        vec![
            Song {
                title: "intro".into(),
                start: 0,
                end: 10,
            },
            Song {
                title: "verse".into(),
                start: 10,
                end: 40,
            },
        ]
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_active_song_boundaries() {
        let songs = demo_songs();
        assert_eq!(active_song_index(&songs, secs(0)), Some(0));
        assert_eq!(active_song_index(&songs, secs(9)), Some(0));
        // Boundary second belongs to the next song.
        assert_eq!(active_song_index(&songs, secs(10)), Some(1));
        assert_eq!(active_song_index(&songs, secs(39)), Some(1));
        // Past the end of the list: stick to the last song.
        assert_eq!(active_song_index(&songs, secs(40)), Some(1));
        assert_eq!(active_song_index(&songs, secs(100)), Some(1));
    }

    #[test]
    fn test_active_song_fallback_to_first() {
        let songs = vec![
            Song {
                title: "late".into(),
                start: 10,
                end: 20,
            },
            Song {
                title: "later".into(),
                start: 30,
                end: 40,
            },
        ];
        // Before every song, and inside a gap, both resolve to the first.
        assert_eq!(active_song_index(&songs, secs(5)), Some(0));
        assert_eq!(active_song_index(&songs, secs(25)), Some(0));
        assert_eq!(active_song_index(&[], secs(5)), None);
    }

    #[test]
    fn test_pause_preserves_elapsed_across_wall_time() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());

        assert!(timeline.play(t0));
        timeline.tick(t0 + secs(5), None);
        assert_eq!(timeline.session().elapsed(), secs(5));

        timeline.pause(t0 + secs(5));
        assert!(!timeline.is_playing());

        // A minute of stopped wall time must not leak into the clock.
        assert!(timeline.play(t0 + secs(65)));
        timeline.tick(t0 + secs(66), None);
        assert_eq!(timeline.session().elapsed(), secs(6));
    }

    #[test]
    fn test_first_activation_resets_elapsed_only_once() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());

        timeline.play(t0);
        timeline.tick(t0 + secs(12), None);
        assert_eq!(timeline.session().current_song(), Some(1));

        timeline.pause(t0 + secs(12));
        timeline.play(t0 + secs(20));
        // Not the first activation, so the clock resumes at 12.
        timeline.tick(t0 + secs(21), None);
        assert_eq!(timeline.session().elapsed(), secs(13));
    }

    #[test]
    fn test_play_while_playing_is_a_no_op() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        assert!(timeline.play(t0));
        assert!(!timeline.play(t0 + secs(1)));
    }

    #[test]
    fn test_seek_while_stopped_starts_playback() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());

        let outcome = timeline.seek_to_song(1, t0).unwrap();
        assert!(outcome.started);
        assert_eq!(outcome.position, secs(10));
        assert!(timeline.is_playing());
        assert_eq!(timeline.session().elapsed(), secs(10));
        assert_eq!(timeline.session().current_song(), Some(1));

        // Seeking marks the session as started: pause keeps the position.
        timeline.pause(t0 + secs(2));
        timeline.play(t0 + secs(9));
        timeline.tick(t0 + secs(10), None);
        assert_eq!(timeline.session().elapsed(), secs(13));
    }

    #[test]
    fn test_seek_while_playing_moves_backwards() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        timeline.play(t0);
        timeline.tick(t0 + secs(30), None);

        let outcome = timeline.seek_to_song(0, t0 + secs(30)).unwrap();
        assert!(!outcome.started);
        assert_eq!(timeline.session().elapsed(), secs(0));

        timeline.tick(t0 + secs(33), None);
        assert_eq!(timeline.session().elapsed(), secs(3));
    }

    #[test]
    fn test_seek_past_total_clamps_to_total() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        timeline.set_total(secs(8));
        timeline.play(t0);

        // The second song starts at 10s but the track is only 8s long.
        let outcome = timeline.seek_to_song(1, t0 + secs(1)).unwrap();
        assert_eq!(outcome.position, secs(8));
        assert_eq!(timeline.session().elapsed(), secs(8));
        assert_eq!(timeline.session().current_song(), Some(0));

        // Later ticks must keep the clock inside [0, total].
        timeline.tick(t0 + secs(2), Some(secs(1)));
        assert_eq!(timeline.session().elapsed(), secs(8));
    }

    #[test]
    fn test_seek_out_of_range_is_none() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        assert_eq!(timeline.seek_to_song(5, t0), None);
        assert!(!timeline.is_playing());
    }

    #[test]
    fn test_tick_clamps_to_media_position() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        timeline.play(t0);

        timeline.tick(t0 + secs(10), Some(secs(3)));
        assert_eq!(timeline.session().elapsed(), secs(3));

        // Media catches up; the clock follows without jumping past it.
        timeline.tick(t0 + secs(11), Some(secs(4)));
        assert_eq!(timeline.session().elapsed(), secs(4));
    }

    #[test]
    fn test_tick_clamps_to_total() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        timeline.set_total(secs(8));
        timeline.play(t0);
        timeline.tick(t0 + secs(30), None);
        assert_eq!(timeline.session().elapsed(), secs(8));
    }

    #[test]
    fn test_finish_closes_the_session() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        timeline.set_total(secs(40));
        timeline.play(t0);
        timeline.tick(t0 + secs(20), None);

        timeline.finish();
        assert!(!timeline.is_playing());
        assert_eq!(timeline.session().elapsed(), secs(40));
        assert_eq!(timeline.session().current_song(), None);

        // The next play is a fresh session from zero.
        timeline.play(t0 + secs(50));
        timeline.tick(t0 + secs(51), None);
        assert_eq!(timeline.session().elapsed(), secs(1));
    }

    #[test]
    fn test_finish_from_paused_starts_fresh() {
        let t0 = Instant::now();
        let mut timeline = TimelineController::new(demo_songs());
        timeline.set_total(secs(40));
        timeline.play(t0);
        timeline.tick(t0 + secs(39), None);
        timeline.pause(t0 + secs(39));

        // The media ran out just before the pause; closing the session
        // from Stopped must look like a natural end.
        timeline.finish();
        assert!(!timeline.has_started());
        assert_eq!(timeline.session().elapsed(), secs(40));

        assert!(timeline.play(t0 + secs(60)));
        timeline.tick(t0 + secs(61), None);
        assert_eq!(timeline.session().elapsed(), secs(1));
    }

    #[test]
    fn test_songs_load_once() {
        let mut timeline = TimelineController::new(Vec::new());
        assert_eq!(timeline.current_song(), None);

        timeline.load_songs(demo_songs());
        assert_eq!(timeline.songs().len(), 2);

        timeline.load_songs(vec![Song {
            title: "other".into(),
            start: 0,
            end: 5,
        }]);
        assert_eq!(timeline.songs().len(), 2);
        assert_eq!(timeline.songs()[0].title, "intro");
    }
}
