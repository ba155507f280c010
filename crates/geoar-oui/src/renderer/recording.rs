//! Display-list backend
//!
//! Records every draw call of the current frame instead of rasterizing. Hosts
//! that composite the overlay themselves can replay the list; tests inspect it.

use unicode_width::UnicodeWidthStr;

use super::backend::{Font, Rect, RenderBackend, RenderError};
use super::surface::{Gradient, Paint, SurfaceCapabilities};

/// Average glyph advance as a fraction of the font size
const GLYPH_ADVANCE: f32 = 0.5;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        paint: Paint,
    },
    FillGradient {
        rect: Rect,
        radius: f32,
        gradient: Gradient,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f32,
        paint: Paint,
        line_width: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        paint: Paint,
    },
    Triangle {
        points: [(f32, f32); 3],
        paint: Paint,
    },
}

/// Backend that keeps the current frame's draw calls in memory
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    available: bool,
    commands: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            available: true,
            commands: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Simulate the surface going away (or coming back)
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Draw calls since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Text strings drawn this frame, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.width,
            height: self.height,
            supports_alpha: true,
            cell_size: None,
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if !self.available {
            return Err(RenderError::SurfaceUnavailable(
                "recording surface detached".to_string(),
            ));
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.frames_presented += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        self.commands
            .push(DrawCommand::FillRoundedRect { rect, radius, paint });
    }

    fn fill_rounded_rect_gradient(&mut self, rect: Rect, radius: f32, gradient: Gradient) {
        self.commands.push(DrawCommand::FillGradient {
            rect,
            radius,
            gradient,
        });
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRoundedRect {
            rect,
            radius,
            paint,
            line_width,
        });
    }

    fn fill_text(&mut self, x: f32, y: f32, text: &str, font: Font, paint: Paint) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font,
            paint,
        });
    }

    fn measure_text(&self, text: &str, font: Font) -> f32 {
        text.width() as f32 * font.size_px * GLYPH_ADVANCE
    }

    fn fill_triangle(&mut self, points: [(f32, f32); 3], paint: Paint) {
        self.commands.push(DrawCommand::Triangle { points, paint });
    }
}
