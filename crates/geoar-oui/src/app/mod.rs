//! Overlay application framework

mod framework;
mod keyboard;
mod terminal;

pub use framework::{OverlayRunner, RunSummary, SessionError};
pub use keyboard::spawn_keyboard;
pub use terminal::TerminalGuard;
