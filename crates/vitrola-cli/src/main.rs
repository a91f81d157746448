//! Vitrola CLI
//!
//! A terminal jukebox: one audio track, a parsed song list and a stage of
//! sprite-sheet dancers rendered with half blocks.

mod tui;

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tui::{App, AssetPaths};
use vitrola_core::config;

/// Vitrola - a cozy terminal jukebox
#[derive(Parser, Debug)]
#[command(name = "vitrola")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding sprite.png, songs.txt and the track.* audio file
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,

    /// Config file (defaults to the per-user config when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write tracing output to this file; the terminal stays clean
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone().or_else(default_log_file);
    init_tracing(log_file.as_deref())?;

    let config = config::load(cli.config.as_deref())?;
    let assets = AssetPaths::locate(&cli.assets);

    // Leave the alternate screen even when a draw panics mid-frame.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tui::restore_terminal();
        default_hook(info);
    }));

    let mut app = App::new(config, assets)?;
    app.run().await
}

/// With `RUST_LOG` set but no `--log-file`, log next to the config file.
fn default_log_file() -> Option<PathBuf> {
    std::env::var_os("RUST_LOG")?;
    Some(config::default_config_path()?.with_file_name("vitrola.log"))
}

/// Log to a file when asked to; stdout belongs to the TUI.
fn init_tracing(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["vitrola"]).unwrap();
        assert_eq!(cli.assets, PathBuf::from("assets"));
        assert!(cli.config.is_none());
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_asset_dir_flag() {
        let cli = Cli::try_parse_from(["vitrola", "--assets", "/tmp/media"]).unwrap();
        assert_eq!(cli.assets, PathBuf::from("/tmp/media"));
    }
}
