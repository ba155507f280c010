//! Terminal rendering backend for simulation

mod backend;
mod cells;

pub use backend::TerminalBackend;
pub use cells::{CellMetrics, CELL_HEIGHT_PX, CELL_WIDTH_PX};
