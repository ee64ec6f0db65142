//! Interception pipeline.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → transaction.rs (phases 1-2: headers, buffered body)
//!     → [interrupt? short-circuit, handler never runs]
//!     → downstream handler (body replayed from the engine's buffer)
//!     → recorder.rs (response captured, or streamed straight through)
//!     → transaction.rs (phases 3-4: status/headers, buffered body)
//!     → [interrupt? buffer discarded] | release buffered response
//!     → close (logging finalized on every path)
//! ```

pub mod middleware;
pub mod recorder;
pub mod transaction;

pub use middleware::{waf_middleware, TransactionId, WafState};
pub use recorder::ResponseRecorder;
pub use transaction::{InspectionError, Inspector, Verdict};
