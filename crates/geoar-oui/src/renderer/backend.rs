//! Render backend trait definition

use super::surface::{Gradient, Paint, SurfaceCapabilities};

/// Error type for rendering operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    /// The drawing surface cannot be used this frame
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// Terminal-specific error
    #[error("Terminal error: {0}")]
    TerminalError(String),
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Font selection for text drawing and measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size_px: f32,
    pub bold: bool,
}

impl Font {
    pub fn regular(size_px: f32) -> Self {
        Self {
            size_px,
            bold: false,
        }
    }

    pub fn bold(size_px: f32) -> Self {
        Self {
            size_px,
            bold: true,
        }
    }
}

/// 2D drawing surface the overlay renders onto.
///
/// Coordinates are pixels with the origin at the top-left corner. Text is
/// positioned by the top-left corner of its line box.
pub trait RenderBackend: Send {
    /// Get surface capabilities
    fn capabilities(&self) -> SurfaceCapabilities;

    /// Begin a new render frame.
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] when there is nothing to
    /// draw onto; callers skip the frame and try again on the next tick.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// End frame and present to display
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Clear the whole surface
    fn clear(&mut self);

    /// Fill a rounded rectangle with a flat paint
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint);

    /// Fill a rounded rectangle with a top-to-bottom gradient
    fn fill_rounded_rect_gradient(&mut self, rect: Rect, radius: f32, gradient: Gradient);

    /// Outline a rounded rectangle
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint, line_width: f32);

    /// Draw a single line of text
    fn fill_text(&mut self, x: f32, y: f32, text: &str, font: Font, paint: Paint);

    /// Width of a single line of text in pixels
    fn measure_text(&self, text: &str, font: Font) -> f32;

    /// Fill a triangle; the first point is the tip
    fn fill_triangle(&mut self, points: [(f32, f32); 3], paint: Paint);
}
