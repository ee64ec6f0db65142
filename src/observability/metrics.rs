//! Metrics collection.
//!
//! Counters for the pipeline's decision points, recorded through the
//! `metrics` facade. Exposition is the host's concern; whatever recorder
//! it installs receives these.
//!
//! # Metrics
//! - `waf_interruptions_total` (counter): verdict-enforced blocks, by leg
//! - `waf_inspection_failures_total` (counter): fail-closed 500s, by leg

use metrics::counter;

/// Record a verdict-enforced block on the given leg ("request"/"response").
pub fn record_interruption(leg: &'static str) {
    counter!("waf_interruptions_total", "leg" => leg).increment(1);
}

/// Record an inspection failure on the given leg.
pub fn record_inspection_failure(leg: &'static str) {
    counter!("waf_inspection_failures_total", "leg" => leg).increment(1);
}
