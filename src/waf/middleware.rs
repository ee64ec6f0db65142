//! Interception middleware.
//!
//! The single orchestration entry point wiring the inspector and the
//! capture buffer around the downstream handler. Attach with
//! `axum::middleware::from_fn_with_state(state, waf_middleware)` on any
//! router whose handlers must not see uninspected traffic.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config::InspectionConfig;
use crate::engine::Engine;
use crate::error::HandlerError;
use crate::observability::metrics;
use crate::waf::recorder::ResponseRecorder;
use crate::waf::transaction::{Inspector, Verdict};

/// Shared middleware state: the compiled engine plus inspection settings.
#[derive(Clone)]
pub struct WafState {
    engine: Arc<dyn Engine>,
    inspect_response_body: bool,
}

impl WafState {
    pub fn new(engine: Arc<dyn Engine>, config: &InspectionConfig) -> Self {
        Self {
            engine,
            inspect_response_body: config.inspect_response_body,
        }
    }
}

/// Transaction ID of the in-flight inspection, inserted into request
/// extensions so later middleware and handlers can correlate with the
/// engine's logs.
#[derive(Debug, Clone)]
pub struct TransactionId(pub String);

/// Inspect one request/response exchange and enforce the engine's verdicts.
pub async fn waf_middleware(
    State(state): State<WafState>,
    request: Request,
    next: Next,
) -> Response {
    let mut inspector = Inspector::new(state.engine.new_transaction());
    let transaction_id = inspector.id().to_string();

    let (mut parts, body) = request.into_parts();
    parts.extensions.insert(TransactionId(transaction_id.clone()));

    let (replay, verdict) = match inspector.begin_request(&parts, body).await {
        Ok(outcome) => outcome,
        Err(err) => return fail(&transaction_id, "request", err),
    };
    if let Verdict::Interrupted(interruption) = verdict {
        return interrupt(&transaction_id, "request", &interruption);
    }

    let request = Request::from_parts(parts, replay);
    let response = next.run(request).await;

    if let Some(interruption) = inspector.interruption() {
        let interruption = interruption.clone();
        return interrupt(&transaction_id, "response", &interruption);
    }

    let mut recorder = ResponseRecorder::new(state.inspect_response_body);
    match recorder.capture(response).await {
        // Streamed straight through; nothing left to deliver.
        Ok(Some(streamed)) => return streamed,
        Ok(None) => {}
        Err(err) => {
            return fail(
                &transaction_id,
                "response",
                crate::waf::InspectionError::BodyRead(err),
            )
        }
    }

    match inspector.end_response(&recorder) {
        Ok(Verdict::Continue) => recorder.release(),
        Ok(Verdict::Interrupted(interruption)) => {
            interrupt(&transaction_id, "response", &interruption)
        }
        Err(err) => fail(&transaction_id, "response", err),
    }
}

fn interrupt(
    transaction_id: &str,
    leg: &'static str,
    interruption: &crate::engine::Interruption,
) -> Response {
    metrics::record_interruption(leg);
    let err = HandlerError::interrupted(transaction_id, interruption);
    tracing::debug!(
        transaction_id = %transaction_id,
        leg,
        status = %err.status,
        rule_id = ?interruption.rule_id,
        "transaction interrupted"
    );
    err.into_response()
}

fn fail(
    transaction_id: &str,
    leg: &'static str,
    err: crate::waf::InspectionError,
) -> Response {
    metrics::record_inspection_failure(leg);
    tracing::error!(
        transaction_id = %transaction_id,
        leg,
        error = %err,
        "inspection failed; request fails closed"
    );
    HandlerError::inspection_failed(transaction_id, err).into_response()
}
