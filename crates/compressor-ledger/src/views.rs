//! Server-rendered pages.
//!
//! Templates are compiled into the binary and rendered with tera. HTML
//! templates are auto-escaped; `invoice.txt` is the plain markup consumed by
//! the invoice PDF exporter.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use crate::invoice::Invoice;
use crate::record::{TestRecord, COLUMNS};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("add_test.html", include_str!("../templates/add_test.html")),
    ("bill.html", include_str!("../templates/bill.html")),
    ("invoice.html", include_str!("../templates/invoice.html")),
    ("invoice.txt", include_str!("../templates/invoice.txt")),
];

#[derive(Serialize)]
struct RecordRow {
    id: i64,
    cells: [String; 8],
}

#[derive(Serialize)]
struct Field {
    label: &'static str,
    value: String,
}

/// Template registry for every page the service renders.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compile the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to parse.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    /// List page. `records` must already be ordered newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn records_page(&self, records: &[TestRecord]) -> Result<String> {
        let rows: Vec<RecordRow> = records
            .iter()
            .map(|record| RecordRow {
                id: record.id,
                cells: record.cells(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("columns", &COLUMNS);
        context.insert("rows", &rows);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Empty creation form.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn add_form(&self) -> Result<String> {
        Ok(self.tera.render("add_test.html", &Context::new())?)
    }

    /// Plain detail page for one record.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn bill_page(&self, record: &TestRecord) -> Result<String> {
        let fields: Vec<Field> = COLUMNS
            .into_iter()
            .zip(record.cells())
            .map(|(label, value)| Field { label, value })
            .collect();

        let mut context = Context::new();
        context.insert("id", &record.id);
        context.insert("fields", &fields);
        Ok(self.tera.render("bill.html", &context)?)
    }

    /// Invoice page.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn invoice_page(&self, invoice: &Invoice) -> Result<String> {
        let mut context = Context::new();
        context.insert("invoice", invoice);
        Ok(self.tera.render("invoice.html", &context)?)
    }

    /// Invoice as line-oriented markup for the PDF exporter.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn invoice_markup(&self, invoice: &Invoice) -> Result<String> {
        let context = Context::from_serialize(invoice)?;
        Ok(self.tera.render("invoice.txt", &context)?)
    }
}
