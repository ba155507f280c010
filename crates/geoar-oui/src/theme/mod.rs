//! Theme system for the message overlay

mod glass;
mod palette;

pub use glass::GlassTheme;
pub use palette::Palette;
