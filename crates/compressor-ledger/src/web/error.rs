//! HTTP rendering of [`crate::Error`].

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::error::Error;

/// Body returned for unknown record ids.
pub const NOT_FOUND_BODY: &str = "Test not found";

const INTERNAL_BODY: &str = "Internal Server Error";

/// A failed request, ready to be turned into a response.
#[derive(Debug)]
pub struct WebError {
    error: Error,
    debug: bool,
}

impl WebError {
    /// Wrap `error`. With `debug` set, server errors carry their detail.
    #[must_use]
    pub fn new(error: Error, debug: bool) -> Self {
        Self { error, debug }
    }

    /// A form body that could not be decoded into the expected fields.
    #[must_use]
    pub fn rejected_form(rejection: &FormRejection, debug: bool) -> Self {
        Self::new(
            Error::InvalidForm {
                message: rejection.body_text(),
            },
            debug,
        )
    }

    /// Status code the error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.error.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.error.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match status {
            StatusCode::NOT_FOUND => {
                warn!(error = %self.error, "Request for missing record");
                NOT_FOUND_BODY.to_string()
            }
            StatusCode::BAD_REQUEST => {
                warn!(error = %self.error, "Rejected submission");
                self.error.to_string()
            }
            _ => {
                error!(error = %self.error, "Request failed");
                if self.debug {
                    self.error.to_string()
                } else {
                    INTERNAL_BODY.to_string()
                }
            }
        };
        (status, body).into_response()
    }
}
