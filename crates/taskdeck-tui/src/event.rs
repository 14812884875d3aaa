//! Application events for the taskdeck TUI.

use crossterm::event::KeyEvent;

/// Events consumed by the main loop.
pub enum AppEvent {
    /// Keyboard input from the terminal.
    Input(KeyEvent),
}
