//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! log_components = true
//! record_trace = true
//! check_reads = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Emit one `trace!` line per component lifecycle step
    pub log_components: bool,
    /// Record an [`ExecutionTrace`](crate::trace::ExecutionTrace)
    pub record_trace: bool,
    /// Reading an unwritten signal aborts instead of yielding zero
    pub check_reads: bool,
    /// Run alternate dispatch entries where a template has one
    pub use_alternate: bool,
    /// Drop children arrays on release. When off, release still moves the
    /// component to `Released` but keeps its handles for inspection.
    pub reclaim: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_components: false,
            record_trace: false,
            check_reads: false,
            use_alternate: false,
            reclaim: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Configuration used by tests: trace on, strict reads.
    pub fn diagnostic() -> Self {
        Self {
            record_trace: true,
            check_reads: true,
            ..Self::default()
        }
    }
}
