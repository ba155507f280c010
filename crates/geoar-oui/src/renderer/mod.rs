//! Rendering backend abstraction for the overlay
//!
//! Provides a trait-based abstraction over 2D drawing surfaces:
//! - Terminal backend for development/simulation
//! - Recording backend that keeps a display list (tests, headless hosts)

mod backend;
mod recording;
mod surface;
pub mod terminal;

pub use backend::{Font, Rect, RenderBackend, RenderError};
pub use recording::{DrawCommand, RecordingBackend};
pub use surface::{Color, Gradient, Paint, SurfaceCapabilities};
