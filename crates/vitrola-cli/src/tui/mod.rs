//! Terminal user interface

mod app;
mod assets;
mod audio;
mod console;
mod layout;
mod marquee;
mod pixel;
mod song_list;
mod stage;
mod theme;
mod widgets;

pub use app::App;
pub use assets::AssetPaths;

use crossterm::event::{DisableMouseCapture, PopKeyboardEnhancementFlags};
use crossterm::terminal::LeaveAlternateScreen;

/// Undo everything `App::new` did to the terminal. Called from both the
/// app's `Drop` and the panic hook, so it must tolerate running twice.
pub fn restore_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(
        std::io::stdout(),
        PopKeyboardEnhancementFlags,
        DisableMouseCapture,
        LeaveAlternateScreen,
        crossterm::cursor::Show,
    );
}
