//! Query-side alias lookup failure.

use thiserror::Error;

/// A query referenced a field alias that the schema does not declare.
///
/// This is reported back to the caller as an "unknown field" and never
/// escalated into a process-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field: {alias}")]
pub struct UnresolvedAlias {
    pub alias: String,
}

impl UnresolvedAlias {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
        }
    }
}
