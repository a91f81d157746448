//! Runtime configuration (config.toml)
//!
//! Every field has a default, so an absent or partial file is fine. The
//! default location is `~/.config/vitrola/config.toml`; an explicitly
//! requested file must exist.

use crate::spawn::SpawnConfig;
use crate::sprite::SheetGeometry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitrolaConfig {
    pub sheet: SheetConfig,
    pub animation: AnimationConfig,
    pub spawn: SpawnTuning,
    pub timeline: TimelineTuning,
}

/// Sprite sheet grid geometry and on-stage scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Width of one grid cell in sheet pixels
    pub cell_width: u32,
    /// Height of one grid cell in sheet pixels
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
    /// Frame index (row-major) shown by the static center character
    pub center_frame: u32,
    /// Sheet pixels to stage pixels; one terminal cell is 1x2 stage pixels
    pub scale: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            cell_width: 64,
            cell_height: 64,
            columns: 4,
            rows: 4,
            center_frame: 0,
            scale: 0.25,
        }
    }
}

impl SheetConfig {
    pub fn geometry(&self) -> SheetGeometry {
        SheetGeometry {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// Per-character frame stepping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub min_frame_interval_ms: u64,
    pub max_frame_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            min_frame_interval_ms: 500,
            max_frame_interval_ms: 1000,
        }
    }
}

impl AnimationConfig {
    /// Sanitized (min, max) interval pair; a reversed pair is swapped.
    pub fn interval_range(&self) -> (Duration, Duration) {
        let min = Duration::from_millis(self.min_frame_interval_ms.min(self.max_frame_interval_ms));
        let max = Duration::from_millis(self.min_frame_interval_ms.max(self.max_frame_interval_ms));
        (min, max)
    }
}

/// Spawn cadence and teardown pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub base_interval_secs: u64,
    pub jitter_secs: u64,
    pub teardown_delay_ms: u64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_secs: 25,
            jitter_secs: 3,
            teardown_delay_ms: 500,
        }
    }
}

impl SpawnTuning {
    pub fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig {
            base_interval: Duration::from_secs(self.base_interval_secs),
            jitter: Duration::from_secs(self.jitter_secs),
            teardown_delay: Duration::from_millis(self.teardown_delay_ms),
        }
    }
}

/// Timeline bookkeeping cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineTuning {
    pub tick_ms: u64,
}

impl Default for TimelineTuning {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

impl TimelineTuning {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}

/// Default config file path (`~/.config/vitrola/config.toml`), if a config
/// directory exists on this platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vitrola").join("config.toml"))
}

/// Load configuration.
///
/// With an explicit `path` the file must exist and parse. Without one, the
/// default location is tried and silently skipped when absent.
pub fn load(path: Option<&Path>) -> Result<VitrolaConfig> {
    match path {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(VitrolaConfig::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<VitrolaConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: VitrolaConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
