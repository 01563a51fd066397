//! Route handlers.
//!
//! Store access and document rendering are blocking, so every handler hands
//! its work to [`AppState::run`].

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use tracing::{debug, info};

use super::error::WebError;
use super::AppState;
use crate::export::{self, Artifact};
use crate::record::RecordForm;

/// `GET /`: every record, newest first.
pub(super) async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    state
        .run(|state| {
            let records = state.records.list()?;
            state.views.records_page(&records)
        })
        .await
        .map(Html)
}

/// `GET /add`: the creation form.
pub(super) async fn add_form(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    state
        .views
        .add_form()
        .map(Html)
        .map_err(|e| WebError::new(e, state.debug))
}

/// `POST /add`: store the submitted record and go back to the list.
pub(super) async fn add_submit(
    State(state): State<AppState>,
    form: Result<Form<RecordForm>, FormRejection>,
) -> Result<Redirect, WebError> {
    let Form(form) = form.map_err(|rejection| WebError::rejected_form(&rejection, state.debug))?;
    state.run(move |state| state.records.submit(form)).await?;
    Ok(Redirect::to("/"))
}

/// `GET /export/csv`
pub(super) async fn export_csv(State(state): State<AppState>) -> Result<Response, WebError> {
    let artifact = state
        .run(|state| {
            let records = state.records.list()?;
            let artifact = export::csv::export(&records)?;
            state.exports.write(&artifact)?;
            info!(records = records.len(), "Exported CSV");
            Ok(artifact)
        })
        .await?;
    Ok(attachment(artifact))
}

/// `GET /export/pdf`
pub(super) async fn export_pdf(State(state): State<AppState>) -> Result<Response, WebError> {
    let artifact = state
        .run(|state| {
            let records = state.records.list()?;
            let artifact = export::pdf::table::export(&records)?;
            state.exports.write(&artifact)?;
            info!(records = records.len(), "Exported PDF report");
            Ok(artifact)
        })
        .await?;
    Ok(attachment(artifact))
}

/// `GET /bill/{id}`: plain detail page.
pub(super) async fn bill_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, WebError> {
    state
        .run(move |state| {
            let record = state.records.get(id)?;
            state.views.bill_page(&record)
        })
        .await
        .map(Html)
}

/// `GET /bill/{id}/pdf`
pub(super) async fn bill_pdf(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let artifact = state
        .run(move |state| {
            let record = state.records.get(id)?;
            export::pdf::bill::export(&record)
        })
        .await?;
    debug!(id, "Rendered bill");
    Ok(attachment(artifact))
}

/// `GET /view_bill/{id}`: invoice page.
pub(super) async fn invoice_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, WebError> {
    state
        .run(move |state| {
            let invoice = state.invoices.render(id)?;
            state.views.invoice_page(&invoice)
        })
        .await
        .map(Html)
}

/// `GET /download_pdf/{id}`: the invoice page content as a PDF.
pub(super) async fn invoice_pdf(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let artifact = state
        .run(move |state| {
            let invoice = state.invoices.render(id)?;
            let markup = state.views.invoice_markup(&invoice)?;
            export::pdf::invoice::export(&markup, invoice.file_name())
        })
        .await?;
    debug!(id, "Rendered invoice");
    Ok(attachment(artifact))
}

fn attachment(artifact: Artifact) -> Response {
    let disposition = artifact.content_disposition();
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
