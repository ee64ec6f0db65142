//! Logging bridge for engine match records.
//!
//! Maps the engine's eight rule severities onto the host's four log levels
//! through one total table and renders each match as a single descriptive
//! line. The line always carries the fixed 403 status context the audit
//! format expects, independent of the status the client eventually gets.

use tracing::Level;

use crate::engine::{MatchedRule, Severity};

/// Status context baked into every formatted match line.
const LOG_STATUS_CONTEXT: u16 = 403;

impl Severity {
    /// Total mapping from rule severity to host log level.
    pub fn log_level(self) -> Level {
        match self {
            Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
                Level::ERROR
            }
            Severity::Warning => Level::WARN,
            Severity::Notice | Severity::Info => Level::INFO,
            Severity::Debug => Level::DEBUG,
        }
    }
}

/// Render a match as one descriptive line.
pub fn format_match(rule: &MatchedRule) -> String {
    let mut line = format!(
        "access attempt matched with code {}: {}",
        LOG_STATUS_CONTEXT, rule.message
    );
    if let Some(id) = rule.id {
        line.push_str(&format!(" [id \"{id}\"]"));
    }
    line.push_str(&format!(" [severity \"{}\"]", rule.severity));
    if let Some(data) = &rule.data {
        line.push_str(&format!(" [data \"{data}\"]"));
    }
    line
}

/// Emit one match record at its mapped level. Never fails.
pub fn log_match(rule: &MatchedRule) {
    let line = format_match(rule);
    let level = rule.severity.log_level();
    if level == Level::ERROR {
        tracing::error!("{line}");
    } else if level == Level::WARN {
        tracing::warn!("{line}");
    } else if level == Level::INFO {
        tracing::info!("{line}");
    } else {
        tracing::debug!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_severity_has_a_mapping() {
        for severity in Severity::ALL {
            let expected = match severity {
                Severity::Emergency
                | Severity::Alert
                | Severity::Critical
                | Severity::Error => Level::ERROR,
                Severity::Warning => Level::WARN,
                Severity::Notice | Severity::Info => Level::INFO,
                Severity::Debug => Level::DEBUG,
            };
            assert_eq!(severity.log_level(), expected, "severity {severity}");
        }
    }

    #[test]
    fn match_line_carries_the_fixed_status_context() {
        let rule = MatchedRule {
            id: Some(942100),
            severity: Severity::Critical,
            message: "SQL injection attempt".to_string(),
            data: Some("union select".to_string()),
        };

        let line = format_match(&rule);

        assert!(line.contains("code 403"));
        assert!(line.contains("[id \"942100\"]"));
        assert!(line.contains("[severity \"critical\"]"));
        assert!(line.contains("[data \"union select\"]"));
    }

    #[test]
    fn anonymous_rules_format_without_an_id() {
        let rule = MatchedRule {
            id: None,
            severity: Severity::Notice,
            message: "anomaly threshold reached".to_string(),
            data: None,
        };

        let line = format_match(&rule);

        assert!(!line.contains("[id"));
        assert!(line.contains("anomaly threshold reached"));
    }
}
