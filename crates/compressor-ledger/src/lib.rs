//! `compressor-ledger` - Record keeping and export service for compressor test results
//!
//! This library stores compressor test records in SQLite and serves them over
//! HTTP as a list, CSV and PDF exports, and per-record bills and invoices.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod invoice;
pub mod logging;
pub mod record;
pub mod service;
pub mod storage;
pub mod views;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use invoice::{Invoice, InvoiceRenderer};
pub use logging::init_logging;
pub use record::{NewTestRecord, RecordForm, TestRecord};
pub use service::RecordService;
pub use storage::{RecordStore, SqliteStore};
pub use web::{router, AppState};
