//! Transaction lifecycle controller.
//!
//! Drives one engine transaction through the four inspection phases in
//! strict order and exposes a uniform [`Verdict`] at the two decision
//! points the middleware acts on. Dropping the [`Inspector`] finalizes the
//! transaction's logging, so the close runs on every exit path, including
//! early interrupts, inspection failures, and unwinds.

use std::io::Read;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use thiserror::Error;

use crate::engine::{Interruption, Transaction};
use crate::waf::recorder::ResponseRecorder;

const RESPONSE_FEED_CHUNK: usize = 8 * 1024;

/// Outcome of a decision-point checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No disruptive rule fired; keep going.
    Continue,
    /// A rule fired; no later phase may run.
    Interrupted(Interruption),
}

/// Inspection failure. The request fails closed: once the engine cannot
/// process a phase, inspection integrity is gone.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("failed to read body stream: {0}")]
    BodyRead(axum::Error),

    #[error(transparent)]
    Engine(#[from] crate::engine::EngineError),

    #[error("buffered body could not be reopened: {0}")]
    Buffer(std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    RequestInspected,
    Interrupted,
    ResponseInspected,
}

/// Owns one engine transaction for the duration of a request.
pub struct Inspector {
    tx: Box<dyn Transaction>,
    phase: Phase,
}

impl Inspector {
    pub fn new(tx: Box<dyn Transaction>) -> Self {
        Self {
            tx,
            phase: Phase::Created,
        }
    }

    /// The transaction's correlation ID.
    pub fn id(&self) -> &str {
        self.tx.id()
    }

    /// Run phases 1 and 2 against the inbound request.
    ///
    /// The request body is streamed into the engine's buffer and, when the
    /// verdict is `Continue`, replayed back as a fresh [`Body`] read from
    /// the engine's authoritative copy: the downstream handler sees an
    /// unconsumed body byte-identical to what was inspected.
    pub async fn begin_request(
        &mut self,
        parts: &Parts,
        body: Body,
    ) -> Result<(Body, Verdict), InspectionError> {
        debug_assert_eq!(self.phase, Phase::Created);

        self.tx.process_request_headers(parts)?;
        if let Some(interruption) = self.checkpoint() {
            return Ok((Body::empty(), Verdict::Interrupted(interruption)));
        }

        let mut body = body;
        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(InspectionError::BodyRead)?;
            if let Ok(data) = frame.into_data() {
                self.tx.write_request_body(&data)?;
            }
        }
        self.tx.process_request_body()?;
        if let Some(interruption) = self.checkpoint() {
            return Ok((Body::empty(), Verdict::Interrupted(interruption)));
        }

        let mut replay = Vec::new();
        self.tx
            .request_body_reader()
            .and_then(|mut reader| reader.read_to_end(&mut replay))
            .map_err(InspectionError::Buffer)?;

        self.phase = Phase::RequestInspected;
        Ok((Body::from(replay), Verdict::Continue))
    }

    /// Run phases 3 and 4 against the captured response.
    ///
    /// Only called when phases 1-2 continued and the recorder buffered.
    pub fn end_response(
        &mut self,
        recorder: &ResponseRecorder,
    ) -> Result<Verdict, InspectionError> {
        debug_assert_eq!(self.phase, Phase::RequestInspected);

        let status = recorder.status().unwrap_or(StatusCode::OK);
        self.tx.process_response_headers(status, recorder.headers())?;
        if let Some(interruption) = self.checkpoint() {
            return Ok(Verdict::Interrupted(interruption));
        }

        let mut reader = recorder.reader().map_err(InspectionError::Buffer)?;
        let mut chunk = [0u8; RESPONSE_FEED_CHUNK];
        loop {
            let n = reader.read(&mut chunk).map_err(InspectionError::Buffer)?;
            if n == 0 {
                break;
            }
            self.tx.write_response_body(&chunk[..n])?;
        }
        self.tx.process_response_body()?;
        if let Some(interruption) = self.checkpoint() {
            return Ok(Verdict::Interrupted(interruption));
        }

        self.phase = Phase::ResponseInspected;
        Ok(Verdict::Continue)
    }

    /// Checkpoint read of the transaction's verdict field.
    ///
    /// Used by the middleware between the handler call and response
    /// inspection; engines that flag the transaction while the handler runs
    /// are honored the same way a phase interrupt is.
    pub fn interruption(&self) -> Option<&Interruption> {
        self.tx.interruption()
    }

    fn checkpoint(&mut self) -> Option<Interruption> {
        let interruption = self.tx.interruption().cloned();
        if interruption.is_some() {
            self.phase = Phase::Interrupted;
        }
        interruption
    }
}

impl Drop for Inspector {
    fn drop(&mut self) {
        self.tx.process_logging();
    }
}
