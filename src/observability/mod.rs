//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine match records:
//!     → logging.rs (severity-mapped single-line log events)
//! pipeline decision points:
//!     → metrics.rs (interruption and failure counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Transaction ID flows through every event for correlation
//! - Metrics are cheap (atomic increments behind the metrics facade)
//! - A formatting problem must never take down traffic

pub mod logging;
pub mod metrics;
