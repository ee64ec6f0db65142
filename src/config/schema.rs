//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! interception layer. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the WAF middleware.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WafConfig {
    /// Rule set and inspection behavior.
    pub inspection: InspectionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Rule set and inspection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectionConfig {
    /// Inline rule-language directives, loaded before any includes.
    pub directives: String,

    /// Rule files to load, in the order given. Entries containing a
    /// wildcard are expanded as glob patterns.
    pub include: Vec<String>,

    /// Buffer response bodies and inspect them before anything reaches the
    /// client. When disabled, responses stream straight through and phases
    /// 3-4 never run.
    pub inspect_response_body: bool,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            directives: String::new(),
            include: Vec::new(),
            inspect_response_body: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
