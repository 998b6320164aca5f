//! Environment-driven configuration for the event indexer.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use event_index_repository::opensearch::{IndexConfig, DEFAULT_INDEX_NAME};
use event_index_repository::pipeline::DEFAULT_PIPELINE_NAME;
use event_index_repository::{EventIndexServiceConfig, TransformMode};
use tracing::warn;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default schema version of the event indices.
const DEFAULT_INDEX_VERSION: u32 = 1;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at a fixed interval until successful.
    #[default]
    Retry,
}

impl FromStr for ConnectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Ok(Self::FailFast),
            "retry" => Ok(Self::Retry),
            other => Err(format!("Invalid connection mode '{}'", other)),
        }
    }
}

/// Everything the indexer reads from its environment.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub opensearch_url: String,
    pub index_name: String,
    pub index_version: u32,
    pub pipeline_name: String,
    pub transform_mode: TransformMode,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    /// Render the provisioning requests instead of sending them.
    pub dry_run: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            index_version: DEFAULT_INDEX_VERSION,
            pipeline_name: DEFAULT_PIPELINE_NAME.to_string(),
            transform_mode: TransformMode::default(),
            connection_mode: ConnectionMode::default(),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
            dry_run: false,
        }
    }
}

impl IndexerConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `EVENTS_INDEX_NAME`: Index base name (default: "events")
    /// - `EVENTS_INDEX_VERSION`: Schema version number (default: 1)
    /// - `EVENTS_PIPELINE`: Ingest pipeline name (default: "events-pipeline")
    /// - `EVENTS_TRANSFORM_MODE`: "pipeline" or "in-process" (default: pipeline)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `PROVISION_DRY_RUN`: "true" to print the requests and exit (default: false)
    ///
    /// Invalid values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            opensearch_url: lookup("OPENSEARCH_URL").unwrap_or(defaults.opensearch_url),
            index_name: lookup("EVENTS_INDEX_NAME").unwrap_or(defaults.index_name),
            index_version: parse_or(
                &lookup,
                "EVENTS_INDEX_VERSION",
                defaults.index_version,
            ),
            pipeline_name: lookup("EVENTS_PIPELINE").unwrap_or(defaults.pipeline_name),
            transform_mode: parse_or(&lookup, "EVENTS_TRANSFORM_MODE", defaults.transform_mode),
            connection_mode: parse_or(
                &lookup,
                "OPENSEARCH_CONNECTION_MODE",
                defaults.connection_mode,
            ),
            retry_interval: Duration::from_secs(parse_or(
                &lookup,
                "OPENSEARCH_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
            dry_run: parse_or(&lookup, "PROVISION_DRY_RUN", defaults.dry_run),
        }
    }

    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.index_name.clone(), self.index_version)
    }

    pub fn service_config(&self) -> EventIndexServiceConfig {
        EventIndexServiceConfig::default()
            .pipeline_name(self.pipeline_name.clone())
            .transform_mode(self.transform_mode)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, default = ?default, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = IndexerConfig::from_lookup(lookup(&[]));

        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.index_name, "events");
        assert_eq!(config.index_version, 1);
        assert_eq!(config.pipeline_name, "events-pipeline");
        assert_eq!(config.transform_mode, TransformMode::Pipeline);
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
        assert_eq!(config.retry_interval, Duration::from_secs(15));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_overrides() {
        let config = IndexerConfig::from_lookup(lookup(&[
            ("OPENSEARCH_URL", "http://search:9200"),
            ("EVENTS_INDEX_NAME", "telemetry"),
            ("EVENTS_INDEX_VERSION", "3"),
            ("EVENTS_PIPELINE", "flatten"),
            ("EVENTS_TRANSFORM_MODE", "in-process"),
            ("OPENSEARCH_CONNECTION_MODE", "FAIL-FAST"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "2"),
            ("PROVISION_DRY_RUN", "true"),
        ]));

        assert_eq!(config.opensearch_url, "http://search:9200");
        assert_eq!(config.index_config().template_name(), "telemetry-v3");
        assert_eq!(config.service_config().pipeline_name, "flatten");
        assert_eq!(config.transform_mode, TransformMode::InProcess);
        assert_eq!(config.connection_mode, ConnectionMode::FailFast);
        assert_eq!(config.retry_interval, Duration::from_secs(2));
        assert!(config.dry_run);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = IndexerConfig::from_lookup(lookup(&[
            ("EVENTS_INDEX_VERSION", "v2"),
            ("EVENTS_TRANSFORM_MODE", "remote"),
            ("OPENSEARCH_CONNECTION_MODE", "sometimes"),
            ("PROVISION_DRY_RUN", "yes"),
        ]));

        assert_eq!(config.index_version, 1);
        assert_eq!(config.transform_mode, TransformMode::Pipeline);
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
        assert!(!config.dry_run);
    }
}
