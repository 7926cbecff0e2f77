//! PDF rendering of daily log sheets.

pub mod canvas;
pub mod log_sheet;
pub mod pdf_canvas;

pub use log_sheet::{LogSheet, SheetEntry, draw_log_sheet, render_log_sheet};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Backend(String),
}
