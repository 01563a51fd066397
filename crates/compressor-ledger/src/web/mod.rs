//! HTTP front end.
//!
//! | Route                    | Response                          |
//! |--------------------------|-----------------------------------|
//! | `GET /`                  | record list, newest first         |
//! | `GET /add`               | creation form                     |
//! | `POST /add`              | store record, `303` back to `/`   |
//! | `GET /export/csv`        | `tests_export.csv` download       |
//! | `GET /export/pdf`        | `tests_export.pdf` download       |
//! | `GET /bill/{id}`         | plain detail page                 |
//! | `GET /bill/{id}/pdf`     | `test_<id>_bill.pdf` download     |
//! | `GET /view_bill/{id}`    | invoice page                      |
//! | `GET /download_pdf/{id}` | `Invoice_<id>.pdf` download       |

mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

pub use error::{WebError, NOT_FOUND_BODY};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::ArtifactWriter;
use crate::invoice::InvoiceRenderer;
use crate::service::RecordService;
use crate::storage::RecordStore;
use crate::views::Views;

/// Shared state of all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    records: RecordService,
    invoices: InvoiceRenderer,
    views: Arc<Views>,
    exports: ArtifactWriter,
    debug: bool,
}

impl AppState {
    /// Wire the services over `store` according to `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page templates fail to compile.
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Result<Self> {
        let records = RecordService::new(store);
        let invoices = InvoiceRenderer::new(records.clone(), config.invoice.clone());
        let exports = if config.export.persist {
            ArtifactWriter::new(config.export_dir())
        } else {
            ArtifactWriter::disabled()
        };

        Ok(Self {
            records,
            invoices,
            views: Arc::new(Views::new()?),
            exports,
            debug: config.server.debug,
        })
    }

    /// Run blocking `work` off the async executor.
    async fn run<T, F>(&self, work: F) -> std::result::Result<T, WebError>
    where
        T: Send + 'static,
        F: FnOnce(&AppState) -> Result<T> + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || work(&state))
            .await
            .unwrap_or_else(|e| Err(Error::internal(format!("request task failed: {e}"))))
            .map_err(|e| WebError::new(e, self.debug))
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add", get(handlers::add_form).post(handlers::add_submit))
        .route("/export/csv", get(handlers::export_csv))
        .route("/export/pdf", get(handlers::export_pdf))
        .route("/bill/{id}", get(handlers::bill_page))
        .route("/bill/{id}/pdf", get(handlers::bill_pdf))
        .route("/view_bill/{id}", get(handlers::invoice_page))
        .route("/download_pdf/{id}", get(handlers::invoice_pdf))
        .with_state(state)
}

/// Serve requests on `listener` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            error!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
