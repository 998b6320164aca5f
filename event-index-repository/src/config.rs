//! Configuration types for the EventIndexService.

use std::fmt;
use std::str::FromStr;

use crate::pipeline::DEFAULT_PIPELINE_NAME;

/// Where the error-chain flattening transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    /// Documents are sent through the registered ingest pipeline.
    #[default]
    Pipeline,
    /// Documents are flattened by the service before sending; no pipeline is used.
    InProcess,
}

impl FromStr for TransformMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pipeline" => Ok(Self::Pipeline),
            "in-process" | "in_process" | "inprocess" => Ok(Self::InProcess),
            other => Err(format!(
                "Invalid transform mode '{}', expected 'pipeline' or 'in-process'",
                other
            )),
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline => write!(f, "pipeline"),
            Self::InProcess => write!(f, "in-process"),
        }
    }
}

/// Configuration for the EventIndexService.
///
/// Controls batch limits, the name the flattening pipeline is registered
/// under, and where the flattening runs.
#[derive(Debug, Clone)]
pub struct EventIndexServiceConfig {
    /// Maximum number of documents allowed in a single batch operation.
    ///
    /// Set to `None` to disable the limit (not recommended for production).
    /// Defaults to 1000 if not specified.
    pub max_batch_size: Option<usize>,
    /// Name of the ingest pipeline.
    pub pipeline_name: String,
    pub transform_mode: TransformMode,
}

impl Default for EventIndexServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            pipeline_name: DEFAULT_PIPELINE_NAME.to_string(),
            transform_mode: TransformMode::default(),
        }
    }
}

impl EventIndexServiceConfig {
    /// Create a config with no batch size limit.
    ///
    /// # Warning
    ///
    /// Use with caution. Removing batch size limits can lead to memory issues
    /// and timeouts when processing very large batches.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    ///
    /// # Arguments
    ///
    /// * `max_batch_size` - Maximum number of documents allowed in a single batch operation
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    pub fn pipeline_name(mut self, name: impl Into<String>) -> Self {
        self.pipeline_name = name.into();
        self
    }

    pub fn transform_mode(mut self, mode: TransformMode) -> Self {
        self.transform_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_mode_parse() {
        assert_eq!("pipeline".parse(), Ok(TransformMode::Pipeline));
        assert_eq!("In-Process".parse(), Ok(TransformMode::InProcess));
        assert_eq!("in_process".parse(), Ok(TransformMode::InProcess));
        assert!("remote".parse::<TransformMode>().is_err());
    }

    #[test]
    fn test_transform_mode_display_parses_back() {
        for mode in [TransformMode::Pipeline, TransformMode::InProcess] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }

    #[test]
    fn test_defaults() {
        let config = EventIndexServiceConfig::default();

        assert_eq!(config.max_batch_size, Some(1000));
        assert_eq!(config.pipeline_name, "events-pipeline");
        assert_eq!(config.transform_mode, TransformMode::Pipeline);
        assert_eq!(EventIndexServiceConfig::unlimited().max_batch_size, None);
    }
}
