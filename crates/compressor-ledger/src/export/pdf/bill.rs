//! Single-record field list PDF.
//!
//! Positions are given in points from the bottom-left corner of an A4
//! portrait page.

use crate::error::Result;
use crate::export::Artifact;
use crate::record::{TestRecord, COLUMNS};

use super::table::TITLE;
use super::{Canvas, Face, Orientation, MM_PER_PT};

const FONT_SIZE: f32 = 12.0;
const TITLE_POS: (f32, f32) = (200.0, 800.0);
const FIELDS_X: f32 = 100.0;
const FIELDS_TOP_Y: f32 = 760.0;
const LINE_STEP: f32 = 20.0;

/// Download name of the bill for record `id`.
#[must_use]
pub fn file_name(id: i64) -> String {
    format!("test_{id}_bill.pdf")
}

/// Render one `Field: value` line per column of `record`.
///
/// # Errors
///
/// Returns an error if the PDF cannot be encoded.
pub fn export(record: &TestRecord) -> Result<Artifact> {
    let canvas = Canvas::new(TITLE, Orientation::Portrait)?;
    let from_top = |y: f32| canvas.height() - y * MM_PER_PT;

    canvas.text(
        TITLE,
        FONT_SIZE,
        Face::Regular,
        TITLE_POS.0 * MM_PER_PT,
        from_top(TITLE_POS.1),
    );

    let mut y = FIELDS_TOP_Y;
    for (label, value) in COLUMNS.iter().zip(record.cells()) {
        canvas.text(
            &format!("{label}: {value}"),
            FONT_SIZE,
            Face::Regular,
            FIELDS_X * MM_PER_PT,
            from_top(y),
        );
        y -= LINE_STEP;
    }

    Ok(Artifact::pdf(file_name(record.id), canvas.finish()?))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(17), "test_17_bill.pdf");
    }

    #[test]
    fn test_export() {
        let record = TestRecord {
            id: 17,
            model: "X200".to_string(),
            temperature: 25.5,
            pressure: 7.2,
            noise: 60.0,
            tester: "Alice".to_string(),
            result: "Pass".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };

        let artifact = export(&record).unwrap();
        assert_eq!(artifact.file_name, "test_17_bill.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}
