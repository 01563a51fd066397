//! Per-record invoices.
//!
//! An [`Invoice`] is built on demand from one stored record and the static
//! billing details in [`InvoiceConfig`]. It is never persisted.
//!
//! Test records carry no price. The single line item therefore bills the
//! recorded temperature as its amount, and every rendering prints
//! [`AMOUNT_SOURCE_NOTE`] so the substitution is visible to the reader.

use chrono::{Local, NaiveDate};
use serde::{Serialize, Serializer};

use crate::config::InvoiceConfig;
use crate::error::Result;
use crate::record::{format_measurement, TestRecord};
use crate::service::RecordService;

/// Format of the invoice date.
pub const INVOICE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Record field used as the line item amount.
pub const AMOUNT_SOURCE: &str = "temperature";

/// Notice printed on every invoice about where the amount comes from.
pub const AMOUNT_SOURCE_NOTE: &str =
    "Amount is taken from the recorded temperature reading; test records carry no price.";

/// One billed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    /// Serial number of the line.
    pub sno: u32,
    /// What is billed (the record's model).
    pub description: String,
    /// Quantity billed.
    pub qty: u32,
    /// Unit rate.
    #[serde(serialize_with = "serialize_amount")]
    pub rate: f64,
    /// Line amount.
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,
}

/// Invoice view-model for one test record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    /// Id of the record this invoice was generated from.
    pub record_id: i64,
    /// Issuing company.
    pub company_name: String,
    /// Line printed under the company name.
    pub company_tagline: String,
    /// `INV-<record id>`.
    pub invoice_no: String,
    /// Date the invoice was generated, not the test date.
    #[serde(serialize_with = "serialize_invoice_date")]
    pub invoice_date: NaiveDate,
    /// Billed party name.
    pub customer_name: String,
    /// Billed party address.
    pub customer_address: String,
    /// Billed lines.
    pub items: Vec<InvoiceItem>,
    /// Sum of all line amounts.
    #[serde(serialize_with = "serialize_amount")]
    pub total: f64,
    /// Amount in words, copied from configuration.
    pub amount_words: String,
    /// Terms and conditions.
    pub terms: String,
    /// Record field the amounts were taken from.
    pub amount_source: &'static str,
    /// Human readable notice about `amount_source`.
    pub amount_note: &'static str,
}

impl Invoice {
    /// Build an invoice for `record`, dated `invoice_date`.
    #[must_use]
    pub fn build(record: &TestRecord, billing: &InvoiceConfig, invoice_date: NaiveDate) -> Self {
        let items = vec![InvoiceItem {
            sno: 1,
            description: record.model.clone(),
            qty: 1,
            rate: record.temperature,
            amount: record.temperature,
        }];
        let total: f64 = items.iter().map(|item| item.amount).sum();

        Self {
            record_id: record.id,
            company_name: billing.company_name.clone(),
            company_tagline: billing.company_tagline.clone(),
            invoice_no: invoice_number(record.id),
            invoice_date,
            customer_name: billing.customer_name.clone(),
            customer_address: billing.customer_address.clone(),
            items,
            total,
            amount_words: billing.amount_words.clone(),
            terms: billing.terms.clone(),
            amount_source: AMOUNT_SOURCE,
            amount_note: AMOUNT_SOURCE_NOTE,
        }
    }

    /// File name offered when the invoice is downloaded.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("Invoice_{}.pdf", self.record_id)
    }
}

/// Invoice number for a record id.
#[must_use]
pub fn invoice_number(id: i64) -> String {
    format!("INV-{id}")
}

/// Builds invoices for stored records.
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    records: RecordService,
    billing: InvoiceConfig,
}

impl InvoiceRenderer {
    /// Create a renderer over the given records and billing details.
    #[must_use]
    pub fn new(records: RecordService, billing: InvoiceConfig) -> Self {
        Self { records, billing }
    }

    /// Build the invoice for record `id`, dated today.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the record does not exist.
    pub fn render(&self, id: i64) -> Result<Invoice> {
        let record = self.records.get(id)?;
        Ok(Invoice::build(&record, &self.billing, Local::now().date_naive()))
    }
}

fn serialize_amount<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_measurement(*value))
}

fn serialize_invoice_date<S: Serializer>(
    date: &NaiveDate,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(INVOICE_DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;
    use crate::record::NewTestRecord;
    use crate::storage::{RecordStore, SqliteStore};

    fn sample_record() -> TestRecord {
        TestRecord {
            id: 12,
            model: "X200".to_string(),
            temperature: 25.5,
            pressure: 7.2,
            noise: 60.0,
            tester: "Alice".to_string(),
            result: "Pass".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_build_uses_record_and_billing() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let invoice = Invoice::build(&sample_record(), &InvoiceConfig::default(), date);

        assert_eq!(invoice.invoice_no, "INV-12");
        assert_eq!(invoice.company_name, "CareLab Diagnostics");
        assert_eq!(invoice.company_tagline, "Precision in Every Report");
        assert_eq!(invoice.amount_words, "One Thousand Rupees Only");
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].sno, 1);
        assert_eq!(invoice.items[0].description, "X200");
        assert_eq!(invoice.items[0].qty, 1);
        assert!((invoice.items[0].rate - 25.5).abs() < f64::EPSILON);
        assert!((invoice.total - 25.5).abs() < f64::EPSILON);
        assert_eq!(invoice.amount_source, "temperature");
        assert_eq!(invoice.file_name(), "Invoice_12.pdf");
    }

    #[test]
    fn test_invoice_date_is_independent_of_test_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let invoice = Invoice::build(&sample_record(), &InvoiceConfig::default(), date);
        assert_eq!(invoice.invoice_date, date);
    }

    #[test]
    fn test_amount_words_ignore_total() {
        let mut record = sample_record();
        record.temperature = 3.0;
        let invoice = Invoice::build(&record, &InvoiceConfig::default(), Local::now().date_naive());
        assert_eq!(invoice.amount_words, "One Thousand Rupees Only");
    }

    #[test]
    fn test_serialized_amounts_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
        let invoice = Invoice::build(&sample_record(), &InvoiceConfig::default(), date);
        let value = serde_json::to_value(&invoice).unwrap();

        assert_eq!(value["invoice_date"], "05-07-2024");
        assert_eq!(value["total"], "25.5");
        assert_eq!(value["items"][0]["amount"], "25.5");
        assert_eq!(value["amount_note"], AMOUNT_SOURCE_NOTE);
    }

    #[test]
    fn test_renderer_not_found() {
        let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let renderer = InvoiceRenderer::new(RecordService::new(store), InvoiceConfig::default());

        assert!(matches!(renderer.render(5), Err(Error::NotFound { id: 5 })));
    }

    #[test]
    fn test_renderer_dates_invoice_today() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let id = store
            .create(&NewTestRecord {
                model: "K9".to_string(),
                temperature: 40.0,
                pressure: 2.0,
                noise: 55.5,
                tester: "Bo".to_string(),
                result: "Fail".to_string(),
            })
            .unwrap();
        let renderer = InvoiceRenderer::new(RecordService::new(store), InvoiceConfig::default());

        let invoice = renderer.render(id).unwrap();
        assert_eq!(invoice.invoice_no, format!("INV-{id}"));
        assert!(invoice.invoice_date <= Local::now().date_naive());
        assert!((invoice.total - 40.0).abs() < f64::EPSILON);
    }
}
