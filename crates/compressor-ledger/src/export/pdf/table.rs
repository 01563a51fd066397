//! Tabular PDF export of all records.
//!
//! A4 landscape, one bordered row per record under a centered title. The
//! header row is repeated at the top of every continuation page.

use crate::error::Result;
use crate::export::Artifact;
use crate::record::{TestRecord, COLUMNS};

use super::{fit_text, text_width, Canvas, Face, Orientation};

/// File name of the bulk PDF export.
pub const FILE_NAME: &str = "tests_export.pdf";

/// Report title.
pub const TITLE: &str = "Compressor Test Report";

/// Column widths in millimetres, in [`COLUMNS`] order.
pub const COLUMN_WIDTHS: [f32; 8] = [10.0, 30.0, 30.0, 30.0, 30.0, 30.0, 20.0, 50.0];

const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 10.0;
const FONT_SIZE: f32 = 10.0;
const CELL_PADDING: f32 = 1.0;
const BASELINE_OFFSET: f32 = 6.5;

/// Render `records` in the given order.
///
/// # Errors
///
/// Returns an error if the PDF cannot be encoded.
pub fn export(records: &[TestRecord]) -> Result<Artifact> {
    let canvas = render(records)?;
    Ok(Artifact::pdf(FILE_NAME, canvas.finish()?))
}

fn render(records: &[TestRecord]) -> Result<Canvas> {
    let mut canvas = Canvas::new(TITLE, Orientation::Landscape)?;

    let title_x = (canvas.width() - text_width(TITLE, FONT_SIZE)) / 2.0;
    canvas.text(TITLE, FONT_SIZE, Face::Regular, title_x, MARGIN + BASELINE_OFFSET);

    let mut top = MARGIN + ROW_HEIGHT;
    draw_row(&canvas, top, &COLUMNS);
    top += ROW_HEIGHT;

    for record in records {
        if top + ROW_HEIGHT > canvas.height() - MARGIN {
            canvas.new_page();
            top = MARGIN;
            draw_row(&canvas, top, &COLUMNS);
            top += ROW_HEIGHT;
        }
        draw_row(&canvas, top, &record.cells());
        top += ROW_HEIGHT;
    }

    Ok(canvas)
}

fn draw_row<S: AsRef<str>>(canvas: &Canvas, top: f32, cells: &[S]) {
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        canvas.rect(x, top, width, ROW_HEIGHT);
        let text = fit_text(cell.as_ref(), FONT_SIZE, width - 2.0 * CELL_PADDING);
        canvas.text(&text, FONT_SIZE, Face::Regular, x + CELL_PADDING, top + BASELINE_OFFSET);
        x += width;
    }
}
