//! Shared utilities for integration testing: a scripted stub engine that
//! stands in for a real rule-matching engine.

use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::sync::Once;

use axum::http::{request::Parts, HeaderMap, StatusCode};
use palisade::engine::{
    Action, Engine, EngineError, Interruption, MatchedRule, Severity, Transaction,
};
use palisade::observability::logging::log_match;

/// What the stub engine should do with the traffic it sees.
#[derive(Clone, Default)]
pub struct Script {
    /// Interrupt phase 2 with this status when the request body contains
    /// the needle.
    pub block_request_containing: Option<(&'static str, u16)>,
    /// Interrupt phase 4 with this status when the response body contains
    /// the needle.
    pub block_response_containing: Option<(&'static str, u16)>,
    /// Fail phase 2 with an internal engine error.
    pub fail_request_body: bool,
    /// Fail phase 4 with an internal engine error.
    pub fail_response_body: bool,
}

/// Scripted engine. Counts transaction closes so tests can assert the
/// close-exactly-once property.
pub struct StubEngine {
    script: Script,
    closed: Arc<AtomicUsize>,
}

impl StubEngine {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            closed: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// How many transactions have finalized logging.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Engine for StubEngine {
    fn new_transaction(&self) -> Box<dyn Transaction> {
        Box::new(StubTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            script: self.script.clone(),
            closed: self.closed.clone(),
            request_body: Vec::new(),
            response_body: Vec::new(),
            interruption: None,
            matched: None,
        })
    }
}

struct StubTransaction {
    id: String,
    script: Script,
    closed: Arc<AtomicUsize>,
    request_body: Vec<u8>,
    response_body: Vec<u8>,
    interruption: Option<Interruption>,
    matched: Option<MatchedRule>,
}

impl StubTransaction {
    fn block(&mut self, status: u16, rule_id: u64, message: &str) {
        self.interruption = Some(Interruption {
            status,
            action: Action::Deny,
            rule_id: Some(rule_id),
        });
        self.matched = Some(MatchedRule {
            id: Some(rule_id),
            severity: Severity::Critical,
            message: message.to_string(),
            data: None,
        });
    }
}

impl Transaction for StubTransaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn process_request_headers(&mut self, _parts: &Parts) -> Result<(), EngineError> {
        Ok(())
    }

    fn write_request_body(&mut self, chunk: &[u8]) -> Result<(), EngineError> {
        self.request_body.extend_from_slice(chunk);
        Ok(())
    }

    fn process_request_body(&mut self) -> Result<(), EngineError> {
        if self.script.fail_request_body {
            return Err(EngineError::Internal("request body parser blew up".into()));
        }
        if let Some((needle, status)) = self.script.block_request_containing {
            if contains(&self.request_body, needle) {
                self.block(status, 1001, "request body matched blocking rule");
            }
        }
        Ok(())
    }

    fn process_response_headers(
        &mut self,
        _status: StatusCode,
        _headers: &HeaderMap,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    fn write_response_body(&mut self, chunk: &[u8]) -> Result<(), EngineError> {
        self.response_body.extend_from_slice(chunk);
        Ok(())
    }

    fn process_response_body(&mut self) -> Result<(), EngineError> {
        if self.script.fail_response_body {
            return Err(EngineError::Internal("response body parser blew up".into()));
        }
        if let Some((needle, status)) = self.script.block_response_containing {
            if contains(&self.response_body, needle) {
                self.block(status, 2001, "response body matched blocking rule");
            }
        }
        Ok(())
    }

    fn process_logging(&mut self) {
        if let Some(rule) = &self.matched {
            log_match(rule);
        }
        self.closed.fetch_add(1, Ordering::SeqCst);
    }

    fn request_body_reader(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(Cursor::new(self.request_body.clone())))
    }

    fn interruption(&self) -> Option<&Interruption> {
        self.interruption.as_ref()
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

/// Install a test subscriber once per binary.
pub fn init_tracing() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "palisade=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}
