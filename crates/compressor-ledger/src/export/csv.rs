//! CSV export of all records.

use csv::Writer;

use crate::error::{Error, Result};
use crate::record::{TestRecord, COLUMNS};

use super::Artifact;

/// File name of the bulk CSV export.
pub const FILE_NAME: &str = "tests_export.csv";

/// Encode `records` as CSV: a header row, then one row per record in the
/// given order.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn export(records: &[TestRecord]) -> Result<Artifact> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.cells())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::export("csv", e.to_string()))?;
    Ok(Artifact::csv(FILE_NAME, bytes))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(id: i64, model: &str) -> TestRecord {
        TestRecord {
            id,
            model: model.to_string(),
            temperature: 25.5,
            pressure: 7.2,
            noise: 60.0,
            tester: "Alice".to_string(),
            result: "Pass".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        }
    }

    fn parse(bytes: &[u8]) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers().unwrap().clone();
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>().unwrap();
        (headers, rows)
    }

    #[test]
    fn test_header_only_when_empty() {
        let artifact = export(&[]).unwrap();
        assert_eq!(
            String::from_utf8(artifact.bytes).unwrap(),
            "ID,Model,Temperature,Pressure,Noise,Tester,Result,Date\n"
        );
        assert_eq!(artifact.file_name, "tests_export.csv");
    }

    #[test]
    fn test_rows_round_trip() {
        let records = vec![record(2, "X200"), record(1, "K9")];
        let artifact = export(&records).unwrap();
        let (headers, rows) = parse(&artifact.bytes);

        assert_eq!(
            headers.iter().collect::<Vec<_>>().join(","),
            "ID,Model,Temperature,Pressure,Noise,Tester,Result,Date"
        );
        assert_eq!(rows.len(), records.len());
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>().join(","),
            "2,X200,25.5,7.2,60.0,Alice,Pass,2024-01-02 03:04:05"
        );
        assert_eq!(&rows[1][1], "K9");
    }

    #[test]
    fn test_free_text_is_quoted() {
        let artifact = export(&[record(1, "Model, \"Deluxe\"")]).unwrap();
        let (_, rows) = parse(&artifact.bytes);
        assert_eq!(&rows[0][1], "Model, \"Deluxe\"");
    }
}
