//! Core record types for compressor-ledger.
//!
//! A [`TestRecord`] is one submitted compressor test outcome. Records are
//! created from a [`RecordForm`] and never updated afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Storage and display format of the creation timestamp.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names in storage order, shared by every export.
pub const COLUMNS: [&str; 8] = [
    "ID",
    "Model",
    "Temperature",
    "Pressure",
    "Noise",
    "Tester",
    "Result",
    "Date",
];

/// A stored compressor test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Compressor model under test.
    pub model: String,
    /// Measured temperature.
    pub temperature: f64,
    /// Measured pressure.
    pub pressure: f64,
    /// Measured noise level.
    pub noise: f64,
    /// Who ran the test.
    pub tester: String,
    /// Outcome, e.g. `Pass` or `Fail`.
    pub result: String,
    /// Creation time, assigned by the store.
    pub date: NaiveDateTime,
}

impl TestRecord {
    /// The creation time in [`DATE_FORMAT`].
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Every field as display text, in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [String; 8] {
        [
            self.id.to_string(),
            self.model.clone(),
            format_measurement(self.temperature),
            format_measurement(self.pressure),
            format_measurement(self.noise),
            self.tester.clone(),
            self.result.clone(),
            self.date_string(),
        ]
    }
}

/// Caller-supplied fields of a record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTestRecord {
    /// Compressor model under test.
    pub model: String,
    /// Measured temperature.
    pub temperature: f64,
    /// Measured pressure.
    pub pressure: f64,
    /// Measured noise level.
    pub noise: f64,
    /// Who ran the test.
    pub tester: String,
    /// Outcome of the test.
    pub result: String,
}

/// Raw form submission, before numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordForm {
    /// Compressor model under test.
    pub model: String,
    /// Temperature as typed by the user.
    pub temperature: String,
    /// Pressure as typed by the user.
    pub pressure: String,
    /// Noise level as typed by the user.
    pub noise: String,
    /// Who ran the test.
    pub tester: String,
    /// Outcome of the test.
    pub result: String,
}

impl RecordForm {
    /// Coerce the numeric fields and produce a record ready for storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first field that is not a
    /// floating point number.
    pub fn into_new_record(self) -> Result<NewTestRecord> {
        let temperature = parse_measurement("temperature", &self.temperature)?;
        let pressure = parse_measurement("pressure", &self.pressure)?;
        let noise = parse_measurement("noise", &self.noise)?;

        Ok(NewTestRecord {
            model: self.model,
            temperature,
            pressure,
            noise,
            tester: self.tester,
            result: self.result,
        })
    }
}

/// Parse a submitted measurement, ignoring surrounding whitespace.
///
/// `NaN` and infinities parse as `f64` but cannot be stored as a REAL, so
/// they are rejected like any other non-number.
fn parse_measurement(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::Validation {
            field,
            value: raw.to_string(),
        })
}

/// Render a measurement in plain decimal notation with at least one
/// fractional digit (`60.0`, `7.2`, `0.0000001`).
#[must_use]
pub fn format_measurement(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}
