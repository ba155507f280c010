//! Terminal backend implementation

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use unicode_width::UnicodeWidthChar;

use super::cells::{CellMetrics, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::renderer::{Color, Font, Gradient, Paint, Rect, RenderBackend, RenderError, SurfaceCapabilities};

/// Cell in the terminal buffer
#[derive(Clone, PartialEq)]
struct Cell {
    symbol: String,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            symbol: " ".to_string(),
            fg: Color::White,
            bg,
            bold: false,
        }
    }
}

/// Terminal rendering backend with diff redraw
pub struct TerminalBackend {
    metrics: CellMetrics,
    /// Render buffer
    buffer: Vec<Cell>,
    /// Previous frame buffer for diff rendering
    prev_buffer: Vec<Cell>,
    /// Clear color
    clear_color: Color,
    /// Force a full redraw on the next frame
    dirty: bool,
}

impl TerminalBackend {
    /// Create a new terminal backend sized to the current terminal
    pub fn new() -> Result<Self, RenderError> {
        let (columns, rows) =
            terminal::size().map_err(|e| RenderError::SurfaceUnavailable(e.to_string()))?;
        Ok(Self::with_size(columns, rows))
    }

    /// Create a backend with a fixed grid (no terminal query)
    pub fn with_size(columns: u16, rows: u16) -> Self {
        let size = columns as usize * rows as usize;
        let clear_color = Color::NIGHT;
        Self {
            metrics: CellMetrics::new(columns, rows),
            buffer: vec![Cell::blank(clear_color); size],
            prev_buffer: vec![Cell::blank(clear_color); size],
            clear_color,
            dirty: true,
        }
    }

    /// Refresh terminal size
    fn refresh_size(&mut self) -> Result<(), RenderError> {
        let (columns, rows) =
            terminal::size().map_err(|e| RenderError::SurfaceUnavailable(e.to_string()))?;
        if columns == 0 || rows == 0 {
            return Err(RenderError::SurfaceUnavailable("terminal has no area".into()));
        }
        self.resize(columns, rows);
        Ok(())
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        if columns != self.metrics.columns || rows != self.metrics.rows {
            self.metrics = CellMetrics::new(columns, rows);
            let size = columns as usize * rows as usize;
            self.buffer = vec![Cell::blank(self.clear_color); size];
            self.prev_buffer = vec![Cell::blank(self.clear_color); size];
            self.dirty = true;
        }
    }

    /// Get buffer index for coordinates
    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col < self.metrics.columns && row < self.metrics.rows {
            Some(row as usize * self.metrics.columns as usize + col as usize)
        } else {
            None
        }
    }

    /// Cells whose centers fall inside a rounded rectangle
    fn cells_in(&self, rect: Rect, radius: f32) -> Vec<(u16, u16)> {
        let (Some((c0, c1)), Some((r0, r1))) = (
            self.metrics.columns_in(rect.x, rect.width),
            self.metrics.rows_in(rect.y, rect.height),
        ) else {
            return Vec::new();
        };

        // Corners are only cut when the radius is at least a full cell
        let cut_corners = radius >= CELL_WIDTH_PX && c1 > c0 && r1 > r0;
        let mut cells = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                let corner = (col == c0 || col == c1) && (row == r0 || row == r1);
                if cut_corners && corner {
                    continue;
                }
                cells.push((col, row));
            }
        }
        cells
    }

    fn tint_background(&mut self, col: u16, row: u16, paint: Paint) {
        if let Some(idx) = self.index(col, row) {
            let cell = &mut self.buffer[idx];
            cell.bg = cell.bg.blend(&paint.color, paint.alpha);
        }
    }

    fn set_glyph(&mut self, col: u16, row: u16, symbol: String, paint: Paint, bold: bool) {
        if let Some(idx) = self.index(col, row) {
            let cell = &mut self.buffer[idx];
            // Terminal glyphs have no alpha; dim toward the background instead
            cell.fg = cell.bg.blend(&paint.color, paint.alpha.max(0.35));
            cell.symbol = symbol;
            cell.bold = bold;
        }
    }

    /// Arrow glyph pointing from the triangle's centroid toward its tip
    fn arrow_for(points: [(f32, f32); 3]) -> &'static str {
        const ARROWS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];
        let cx = (points[0].0 + points[1].0 + points[2].0) / 3.0;
        let cy = (points[0].1 + points[1].1 + points[2].1) / 3.0;
        let dx = points[0].0 - cx;
        let dy = points[0].1 - cy;
        // Screen y grows downward, so up is -dy
        let angle = dx.atan2(-dy).to_degrees().rem_euclid(360.0);
        let sector = ((angle + 22.5) / 45.0).floor() as usize % 8;
        ARROWS[sector]
    }
}

impl RenderBackend for TerminalBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        let (width, height) = self.metrics.pixel_size();
        SurfaceCapabilities {
            width,
            height,
            supports_alpha: false, // Terminal has limited alpha support
            cell_size: Some((CELL_WIDTH_PX, CELL_HEIGHT_PX)),
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.refresh_size()?;

        // Swap buffers
        std::mem::swap(&mut self.buffer, &mut self.prev_buffer);
        self.clear();

        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let mut stdout = io::stdout();

        // Hide cursor during rendering
        queue!(stdout, cursor::Hide).map_err(|e| RenderError::TerminalError(e.to_string()))?;

        // Diff render - only update changed cells
        for row in 0..self.metrics.rows {
            for col in 0..self.metrics.columns {
                let Some(idx) = self.index(col, row) else {
                    continue;
                };
                let cell = &self.buffer[idx];
                if !self.dirty && *cell == self.prev_buffer[idx] {
                    continue;
                }
                // Trailing half of a wide glyph
                if cell.symbol.is_empty() {
                    continue;
                }

                let weight = if cell.bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                };
                queue!(
                    stdout,
                    cursor::MoveTo(col, row),
                    SetAttribute(weight),
                    SetForegroundColor(cell.fg.to_crossterm()),
                    SetBackgroundColor(cell.bg.to_crossterm()),
                    Print(&cell.symbol)
                )
                .map_err(|e| RenderError::TerminalError(e.to_string()))?;
            }
        }

        stdout
            .flush()
            .map_err(|e| RenderError::TerminalError(e.to_string()))?;
        self.dirty = false;

        Ok(())
    }

    fn clear(&mut self) {
        let blank = Cell::blank(self.clear_color);
        for cell in &mut self.buffer {
            *cell = blank.clone();
        }
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        for (col, row) in self.cells_in(rect, radius) {
            self.tint_background(col, row, paint);
        }
    }

    fn fill_rounded_rect_gradient(&mut self, rect: Rect, radius: f32, gradient: Gradient) {
        for (col, row) in self.cells_in(rect, radius) {
            let (_, cy) = self.metrics.cell_center(col, row);
            let t = if rect.height > 0.0 {
                (cy - rect.y) / rect.height
            } else {
                0.0
            };
            self.tint_background(col, row, gradient.sample(t));
        }
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint, _line_width: f32) {
        let (Some((c0, c1)), Some((r0, r1))) = (
            self.metrics.columns_in(rect.x, rect.width),
            self.metrics.rows_in(rect.y, rect.height),
        ) else {
            return;
        };
        if c0 == c1 || r0 == r1 {
            return;
        }

        let rounded = radius > 0.0;
        for row in r0..=r1 {
            for col in c0..=c1 {
                let symbol = match (col == c0, col == c1, row == r0, row == r1) {
                    (true, _, true, _) => if rounded { "╭" } else { "┌" },
                    (_, true, true, _) => if rounded { "╮" } else { "┐" },
                    (true, _, _, true) => if rounded { "╰" } else { "└" },
                    (_, true, _, true) => if rounded { "╯" } else { "┘" },
                    (_, _, true, _) | (_, _, _, true) => "─",
                    (true, _, _, _) | (_, true, _, _) => "│",
                    _ => continue,
                };
                self.set_glyph(col, row, symbol.to_string(), paint, false);
            }
        }
    }

    fn fill_text(&mut self, x: f32, y: f32, text: &str, font: Font, paint: Paint) {
        let row_px = y + CELL_HEIGHT_PX / 2.0;
        let Some((mut col, row)) = self.metrics.cell_at(x.max(0.0), row_px) else {
            return;
        };

        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            if col + width > self.metrics.columns {
                break;
            }
            self.set_glyph(col, row, ch.to_string(), paint, font.bold);
            if width == 2 {
                self.set_glyph(col + 1, row, String::new(), paint, font.bold);
            }
            col += width;
        }
    }

    fn measure_text(&self, text: &str, _font: Font) -> f32 {
        let columns: usize = text.chars().filter_map(|c| c.width()).sum();
        columns as f32 * CELL_WIDTH_PX
    }

    fn fill_triangle(&mut self, points: [(f32, f32); 3], paint: Paint) {
        let cx = (points[0].0 + points[1].0 + points[2].0) / 3.0;
        let cy = (points[0].1 + points[1].1 + points[2].1) / 3.0;
        if let Some((col, row)) = self.metrics.cell_at(cx, cy) {
            self.set_glyph(col, row, Self::arrow_for(points).to_string(), paint, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol_at(backend: &TerminalBackend, col: u16, row: u16) -> String {
        backend.buffer[backend.index(col, row).unwrap()].symbol.clone()
    }

    #[test]
    fn test_capabilities_in_pixels() {
        let backend = TerminalBackend::with_size(80, 24);
        let caps = backend.capabilities();
        assert_eq!((caps.width, caps.height), (640, 384));
        assert!(!caps.supports_alpha);
    }

    #[test]
    fn test_text_lands_in_cells() {
        let mut backend = TerminalBackend::with_size(20, 4);
        backend.fill_text(16.0, 16.0, "hey", Font::bold(14.0), Paint::opaque(Color::White));
        assert_eq!(symbol_at(&backend, 2, 1), "h");
        assert_eq!(symbol_at(&backend, 4, 1), "y");
        assert!(backend.buffer[backend.index(2, 1).unwrap()].bold);
    }

    #[test]
    fn test_text_clipped_at_edge() {
        let mut backend = TerminalBackend::with_size(4, 1);
        backend.fill_text(16.0, 0.0, "abcdef", Font::regular(12.0), Paint::opaque(Color::White));
        assert_eq!(symbol_at(&backend, 2, 0), "a");
        assert_eq!(symbol_at(&backend, 3, 0), "b");
    }

    #[test]
    fn test_measure_counts_columns() {
        let backend = TerminalBackend::with_size(10, 2);
        assert_eq!(backend.measure_text("abc", Font::regular(16.0)), 24.0);
    }

    #[test]
    fn test_stroke_draws_rounded_corners() {
        let mut backend = TerminalBackend::with_size(10, 5);
        let rect = Rect::new(0.0, 0.0, 48.0, 48.0);
        backend.stroke_rounded_rect(rect, 12.0, Paint::opaque(Color::White), 1.0);
        assert_eq!(symbol_at(&backend, 0, 0), "╭");
        assert_eq!(symbol_at(&backend, 5, 0), "╮");
        assert_eq!(symbol_at(&backend, 0, 2), "╰");
        assert_eq!(symbol_at(&backend, 3, 0), "─");
        assert_eq!(symbol_at(&backend, 0, 1), "│");
    }

    #[test]
    fn test_fill_tints_background() {
        let mut backend = TerminalBackend::with_size(4, 2);
        backend.fill_rounded_rect(Rect::new(0.0, 0.0, 32.0, 32.0), 0.0, Color::White.with_alpha(1.0));
        assert_eq!(backend.buffer[0].bg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_arrow_direction() {
        let up = [(0.0, -10.0), (-5.0, 5.0), (5.0, 5.0)];
        assert_eq!(TerminalBackend::arrow_for(up), "↑");
        let right = [(10.0, 0.0), (-5.0, -5.0), (-5.0, 5.0)];
        assert_eq!(TerminalBackend::arrow_for(right), "→");
    }
}
