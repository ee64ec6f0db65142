//! Rule provisioning.
//!
//! Feeds a configured rule set into an engine's [`RuleLoader`]: the inline
//! directives string first, then every include entry in the order given.
//! Include entries containing a wildcard are expanded as glob patterns, and
//! the expansion is loaded in the order the glob yields. Any file that fails
//! to load or parse aborts provisioning; a middleware instance with half a
//! ruleset must never come up.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::InspectionConfig;
use crate::engine::{RuleError, RuleLoader};

/// Fatal provisioning failure. The middleware instance fails to initialize.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid include pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to expand include pattern {pattern:?}: {source}")]
    Expand {
        pattern: String,
        source: glob::GlobError,
    },

    #[error("failed to load rule file {path:?}: {source}")]
    File { path: PathBuf, source: RuleError },

    #[error("failed to load inline directives: {0}")]
    Directives(RuleError),
}

/// Load the configured directives and includes into `loader`.
pub fn load_rules<L: RuleLoader + ?Sized>(
    loader: &mut L,
    config: &InspectionConfig,
) -> Result<(), SetupError> {
    if !config.directives.is_empty() {
        loader
            .load_directives(&config.directives)
            .map_err(SetupError::Directives)?;
    }

    tracing::debug!(count = config.include.len(), "loading rule includes");
    for pattern in &config.include {
        if pattern.contains('*') {
            tracing::debug!(pattern = %pattern, "expanding include glob");
            let entries = glob::glob(pattern).map_err(|source| SetupError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            for entry in entries {
                let path = entry.map_err(|source| SetupError::Expand {
                    pattern: pattern.clone(),
                    source,
                })?;
                load_file(loader, &path)?;
            }
        } else {
            load_file(loader, Path::new(pattern))?;
        }
    }
    Ok(())
}

fn load_file<L: RuleLoader + ?Sized>(loader: &mut L, path: &Path) -> Result<(), SetupError> {
    tracing::debug!(path = %path.display(), "loading rule file");
    loader.load_file(path).map_err(|source| SetupError::File {
        path: path.to_path_buf(),
        source,
    })
}
