//! Song list parsing
//!
//! One song per line: `<title> <M:SS>-<M:SS>`, where the range is the song's
//! start and end offset into the single backing track. Titles may contain
//! spaces (and even range look-alikes); the last range on the line wins.
//! Lines that do not match are skipped individually.

use crate::error::SongError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::time::Duration;

static SONG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\s+(\d+):([0-5]\d)-(\d+):([0-5]\d)$").unwrap());

/// One song: a titled interval of the backing track, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    /// Inclusive start offset in seconds
    pub start: u32,
    /// Exclusive end offset in seconds
    pub end: u32,
}

impl Song {
    pub fn start_position(&self) -> Duration {
        Duration::from_secs(u64::from(self.start))
    }

    pub fn end_position(&self) -> Duration {
        Duration::from_secs(u64::from(self.end))
    }

    pub fn duration_secs(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Parse a single line. Returns `None` for lines that do not match the
/// pattern or whose range is empty or inverted.
pub fn parse_song_line(line: &str) -> Option<Song> {
    let caps = SONG_LINE.captures(line.trim())?;

    let minutes_secs = |m: usize, s: usize| -> Option<u32> {
        let minutes: u32 = caps.get(m)?.as_str().parse().ok()?;
        let seconds: u32 = caps.get(s)?.as_str().parse().ok()?;
        minutes.checked_mul(60)?.checked_add(seconds)
    };

    let title = caps.get(1)?.as_str().trim().to_string();
    let start = minutes_secs(2, 3)?;
    let end = minutes_secs(4, 5)?;
    if end <= start {
        tracing::debug!(line, "skipping song line with empty or inverted range");
        return None;
    }

    Some(Song { title, start, end })
}

/// Parse a whole song list, keeping every line that parses.
pub fn parse_song_list(text: &str) -> Vec<Song> {
    text.lines().filter_map(parse_song_line).collect()
}

/// Read and parse a song list file.
pub fn load_song_list(path: &Path) -> Result<Vec<Song>, SongError> {
    let text = std::fs::read_to_string(path).map_err(|source| SongError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let songs = parse_song_list(&text);
    tracing::debug!(count = songs.len(), path = %path.display(), "loaded song list");
    Ok(songs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_line() {
        let song = parse_song_line("branco 4:20-7:22").unwrap();
        assert_eq!(song.title, "branco");
        assert_eq!(song.start, 260);
        assert_eq!(song.end, 442);
        assert_eq!(song.duration_secs(), 182);
    }

    #[test]
    fn test_parse_title_with_spaces() {
        let song = parse_song_line("joga bonito 0:00-1:30").unwrap();
        assert_eq!(song.title, "joga bonito");
        assert_eq!(song.start, 0);
        assert_eq!(song.end, 90);
    }

    #[test]
    fn test_last_range_on_line_wins() {
        let song = parse_song_line("remix 1:00-2:00 extended 3:00-4:05").unwrap();
        assert_eq!(song.title, "remix 1:00-2:00 extended");
        assert_eq!(song.start, 180);
        assert_eq!(song.end, 245);
    }

    #[test]
    fn test_multi_digit_minutes() {
        let song = parse_song_line("finale 12:00-103:59").unwrap();
        assert_eq!(song.start, 720);
        assert_eq!(song.end, 6239);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        assert!(parse_song_line("").is_none());
        assert!(parse_song_line("no range here").is_none());
        assert!(parse_song_line("missing end 1:30-").is_none());
        assert!(parse_song_line("bad seconds 1:75-2:00").is_none());
        assert!(parse_song_line("4:20-7:22").is_none());
    }

    #[test]
    fn test_inverted_range_is_skipped() {
        assert!(parse_song_line("backwards 5:00-4:00").is_none());
        assert!(parse_song_line("empty 5:00-5:00").is_none());
    }

    #[test]
    fn test_parse_list_keeps_good_lines() {
        let text = "intro 0:00-0:10\n\ngarbage line\nverse 0:10-0:40\n";
        let songs = parse_song_list(text);
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "intro");
        assert_eq!(songs[1].title, "verse");
    }

    #[test]
    fn test_load_song_list_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "um 0:00-0:30").unwrap();
        writeln!(file, "dois 0:30-1:00").unwrap();

        let songs = load_song_list(file.path()).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].start, 30);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_song_list(&dir.path().join("songs.txt"));
        assert!(result.is_err());
    }
}
