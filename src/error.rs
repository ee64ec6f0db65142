//! Handler-level error surface.
//!
//! What the host framework sees when a request does not get the handler's
//! response: a status code, the transaction ID for correlation, and the
//! underlying failure when there is one. Rendering is deliberately bare
//! (status with an empty body) so the host's error renderer stays in
//! charge of presentation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::engine::Interruption;
use crate::waf::InspectionError;

/// Status used when an interruption does not carry a usable one.
const DEFAULT_BLOCK_STATUS: StatusCode = StatusCode::FORBIDDEN;

/// Terminal outcome of an intercepted request.
#[derive(Debug, Error)]
#[error("transaction {transaction_id} resolved with status {status}")]
pub struct HandlerError {
    pub status: StatusCode,
    pub transaction_id: String,
    #[source]
    pub source: Option<InspectionError>,
}

impl HandlerError {
    /// A deliberate policy verdict. Unset or invalid statuses fall back to
    /// 403.
    pub fn interrupted(transaction_id: &str, interruption: &Interruption) -> Self {
        let status =
            StatusCode::from_u16(interruption.status).unwrap_or(DEFAULT_BLOCK_STATUS);
        Self {
            status,
            transaction_id: transaction_id.to_string(),
            source: None,
        }
    }

    /// Inspection could not complete; the request fails closed.
    pub fn inspection_failed(transaction_id: &str, source: InspectionError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            transaction_id: transaction_id.to_string(),
            source: Some(source),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        self.status.into_response()
    }
}
