//! Pixel to terminal-cell mapping
//!
//! The overlay works in pixels; the terminal only has character cells. Each
//! cell is treated as a fixed block of pixels.

/// Nominal pixel width of one terminal cell
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Nominal pixel height of one terminal cell
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Cell grid geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub columns: u16,
    pub rows: u16,
}

impl CellMetrics {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Surface size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.columns as f32 * CELL_WIDTH_PX) as u32,
            (self.rows as f32 * CELL_HEIGHT_PX) as u32,
        )
    }

    /// Cell containing a pixel, or None when off-screen
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let col = (x / CELL_WIDTH_PX).floor() as u32;
        let row = (y / CELL_HEIGHT_PX).floor() as u32;
        if col < self.columns as u32 && row < self.rows as u32 {
            Some((col as u16, row as u16))
        } else {
            None
        }
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * CELL_WIDTH_PX,
            (row as f32 + 0.5) * CELL_HEIGHT_PX,
        )
    }

    /// Inclusive range of cells whose centers fall inside a pixel span,
    /// clipped to the grid
    pub fn span(&self, start_px: f32, end_px: f32, cell_px: f32, limit: u16) -> Option<(u16, u16)> {
        if limit == 0 {
            return None;
        }
        let first = ((start_px / cell_px) - 0.5).ceil().max(0.0);
        let last = ((end_px / cell_px) - 0.5).floor().min(limit as f32 - 1.0);
        if first > last {
            None
        } else {
            Some((first as u16, last as u16))
        }
    }

    pub fn columns_in(&self, x: f32, width: f32) -> Option<(u16, u16)> {
        self.span(x, x + width, CELL_WIDTH_PX, self.columns)
    }

    pub fn rows_in(&self, y: f32, height: f32) -> Option<(u16, u16)> {
        self.span(y, y + height, CELL_HEIGHT_PX, self.rows)
    }
}
