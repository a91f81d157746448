//! Audio playback through rodio
//!
//! One output stream and one sink for the single backing track. Audio is
//! strictly optional: when the device or the file is unusable the player
//! degrades to a no-op and the caller keeps the UI alive. A failed startup
//! arms exactly one retry, consumed by the next play attempt.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct AudioPlayer {
    path: Option<PathBuf>,
    backend: Option<Backend>,
    retry_available: bool,
}

struct Backend {
    // Dropping the stream silences the sink, so it rides along here.
    _stream: OutputStream,
    sink: Sink,
    duration: Option<Duration>,
}

impl Backend {
    fn open(path: &Path) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device available")?;
        let sink = Sink::try_new(&handle).context("failed to create audio sink")?;
        sink.pause();

        let mut backend = Self {
            _stream: stream,
            sink,
            duration: None,
        };
        backend.load(path)?;
        Ok(backend)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("failed to open audio track {}", path.display()))?;
        let decoder = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode audio track {}", path.display()))?;

        self.duration = self.duration.or_else(|| decoder.total_duration());
        self.sink.pause();
        self.sink.append(decoder);
        Ok(())
    }
}

impl AudioPlayer {
    /// Open the device and decode the track up front. Failure is logged
    /// and leaves a muted player behind.
    pub fn new(path: Option<PathBuf>) -> Self {
        let backend = path.as_deref().and_then(|p| match Backend::open(p) {
            Ok(backend) => {
                tracing::info!(path = %p.display(), duration = ?backend.duration, "audio ready");
                Some(backend)
            }
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "audio unavailable");
                None
            }
        });

        Self {
            retry_available: backend.is_none() && path.is_some(),
            path,
            backend,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Track length from the container metadata, when the decoder knows it.
    pub fn duration(&self) -> Option<Duration> {
        self.backend.as_ref().and_then(|b| b.duration)
    }

    /// Start or resume playback. `false` means no audio came out and the
    /// caller should not advance playback state.
    pub fn play(&mut self) -> bool {
        if !self.ensure_backend() {
            return false;
        }
        if !self.ensure_source() {
            return false;
        }
        if let Some(backend) = &self.backend {
            backend.sink.play();
            return true;
        }
        false
    }

    pub fn pause(&mut self) {
        if let Some(backend) = &self.backend {
            backend.sink.pause();
        }
    }

    /// Jump to `position`. Unsupported containers log and report failure;
    /// playback keeps running from wherever it was.
    pub fn seek(&mut self, position: Duration) -> bool {
        if !self.ensure_source() {
            return false;
        }
        let Some(backend) = &self.backend else {
            return false;
        };
        match backend.sink.try_seek(position) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(?position, %error, "seek failed");
                false
            }
        }
    }

    /// Position reported by the sink, for clamping the timer.
    pub fn position(&self) -> Option<Duration> {
        self.backend.as_ref().map(|b| b.sink.get_pos())
    }

    /// The appended source ran out.
    pub fn finished(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.sink.empty())
    }

    fn ensure_backend(&mut self) -> bool {
        if self.backend.is_some() {
            return true;
        }
        let Some(path) = self.path.clone() else {
            return false;
        };
        if !self.retry_available {
            return false;
        }
        self.retry_available = false;

        match Backend::open(&path) {
            Ok(backend) => {
                tracing::info!("audio recovered on retry");
                self.backend = Some(backend);
                true
            }
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "audio retry failed");
                false
            }
        }
    }

    /// Re-append the decoder after the track has played to its end.
    fn ensure_source(&mut self) -> bool {
        let Some(path) = self.path.clone() else {
            return false;
        };
        let Some(backend) = &mut self.backend else {
            return false;
        };
        if !backend.sink.empty() {
            return true;
        }
        match backend.load(&path) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "failed to reload audio track");
                false
            }
        }
    }
}
