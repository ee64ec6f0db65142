//! Inspection engine contract.
//!
//! The rule-matching engine itself lives outside this crate. Everything the
//! interception pipeline needs from it is captured by the [`Engine`] and
//! [`Transaction`] traits: a shared, compiled ruleset that mints cheap
//! per-request transactions, and a transaction that is fed the four
//! inspection phases in order and records its verdict in
//! [`Transaction::interruption`].

use std::io::{self, Read};
use std::path::Path;

use axum::http::{request::Parts, HeaderMap, StatusCode};
use thiserror::Error;

pub mod provision;

/// A compiled ruleset shared across all in-flight requests.
///
/// Implementations must support concurrent [`Engine::new_transaction`] calls
/// without external locking; the `Send + Sync` bound makes the singleton
/// usable behind an `Arc` from every request task.
pub trait Engine: Send + Sync {
    /// Create a fresh transaction for one inbound request. Cheap, no I/O.
    fn new_transaction(&self) -> Box<dyn Transaction>;
}

/// One security transaction, exclusively owned by a single request.
///
/// Phase calls are synchronous and may block (body buffering can spill to
/// engine-managed storage). Callers drive the phases strictly in order:
/// request headers, request body, response headers, response body. Each
/// `process_*` call may set the interruption as a side effect; once set it
/// is never cleared for the lifetime of the transaction.
pub trait Transaction: Send {
    /// Opaque unique ID assigned at creation, used for correlation.
    fn id(&self) -> &str;

    /// Phase 1: inspect request line and headers.
    fn process_request_headers(&mut self, parts: &Parts) -> Result<(), EngineError>;

    /// Append a chunk of the inbound request body to the engine's buffer.
    fn write_request_body(&mut self, chunk: &[u8]) -> Result<(), EngineError>;

    /// Phase 2: inspect the buffered request body.
    fn process_request_body(&mut self) -> Result<(), EngineError>;

    /// Phase 3: inspect response status and headers.
    fn process_response_headers(
        &mut self,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Result<(), EngineError>;

    /// Append a chunk of the captured response body to the engine's buffer.
    fn write_response_body(&mut self, chunk: &[u8]) -> Result<(), EngineError>;

    /// Phase 4: inspect the buffered response body.
    fn process_response_body(&mut self) -> Result<(), EngineError>;

    /// Finalize logging of every rule matched during any phase.
    ///
    /// Called exactly once, on every exit path.
    fn process_logging(&mut self);

    /// Re-readable view of the request body the engine buffered during
    /// phase 2. The downstream handler sees this copy, not the original
    /// stream.
    fn request_body_reader(&self) -> io::Result<Box<dyn Read + Send + '_>>;

    /// The verdict recorded by a matched disruptive rule, if any.
    fn interruption(&self) -> Option<&Interruption>;
}

/// Verdict recorded on a transaction when a disruptive rule fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interruption {
    /// HTTP status the rule asked for; `0` means the rule did not set one.
    pub status: u16,
    /// Disruptive action the rule carries.
    pub action: Action,
    /// Rule that fired, when known.
    pub rule_id: Option<u64>,
}

/// Disruptive actions an interruption can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Deny,
    Drop,
    Redirect,
}

/// Severity attached to a matched rule, ordered most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    /// All severities, in order. Used to prove the log-level mapping total.
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "emergency",
            Severity::Alert => "alert",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule match reported by the engine when a transaction's logging is
/// finalized.
#[derive(Debug, Clone)]
pub struct MatchedRule {
    /// Rule ID, when the rule declares one.
    pub id: Option<u64>,
    pub severity: Severity,
    /// Human-readable rule message.
    pub message: String,
    /// The matched payload excerpt, when the engine captured one.
    pub data: Option<String>,
}

/// Failure inside the engine while processing a phase.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Body bytes could not be read into or out of the engine's buffer.
    #[error("body buffer I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The engine failed internally; inspection integrity is gone.
    #[error("{0}")]
    Internal(String),
}

/// Failure parsing or loading a piece of the rule set.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sink for rule-language sources at provisioning time.
///
/// Engines expose their parser through this trait so the crate can feed it
/// configured directives and include files without knowing the rule grammar.
pub trait RuleLoader {
    /// Parse an inline rule-language string.
    fn load_directives(&mut self, directives: &str) -> Result<(), RuleError>;

    /// Parse one rule file.
    fn load_file(&mut self, path: &Path) -> Result<(), RuleError>;
}
