//! Inline WAF interception middleware for Axum services.
//!
//! Sits between the router and the downstream handler, feeding both
//! directions of traffic through a stateful inspection engine and
//! enforcing its verdicts: requests are inspected before the handler runs,
//! responses are captured and inspected before anything reaches the
//! client, and a blocked exchange resolves to the verdict's status with
//! the handler's output discarded.
//!
//! The rule-matching engine is external; implement [`engine::Engine`] and
//! [`engine::Transaction`] over it, provision its rules through
//! [`engine::provision::load_rules`], and attach the middleware with
//! `axum::middleware::from_fn_with_state(WafState::new(...), waf_middleware)`.

// Core pipeline
pub mod engine;
pub mod error;
pub mod waf;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::WafConfig;
pub use engine::{Engine, Interruption, Transaction};
pub use error::HandlerError;
pub use waf::{waf_middleware, TransactionId, WafState};
