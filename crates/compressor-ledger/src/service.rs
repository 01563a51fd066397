//! Record service.
//!
//! Thin layer between the HTTP handlers and the [`RecordStore`]: it coerces
//! form submissions and otherwise passes calls straight through.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::record::{RecordForm, TestRecord};
use crate::storage::RecordStore;

/// Create, list and fetch test records.
#[derive(Debug, Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    /// Wrap a store handle.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validate a form submission and store it.
    ///
    /// Nothing is written when a numeric field fails to parse.
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-numeric measurements, or a storage
    /// error if the insert fails.
    pub fn submit(&self, form: RecordForm) -> Result<i64> {
        let record = form.into_new_record().inspect_err(|err| {
            warn!("Rejected test submission: {err}");
        })?;
        let id = self.store.create(&record)?;
        info!(id, model = %record.model, "Recorded compressor test");
        Ok(id)
    }

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self) -> Result<Vec<TestRecord>> {
        self.store.list_all()
    }

    /// One record by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for unknown ids.
    pub fn get(&self, id: i64) -> Result<TestRecord> {
        self.store.get(id)
    }
}
