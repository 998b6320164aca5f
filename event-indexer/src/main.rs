//! Event Indexer Main Entry Point
//!
//! Builds the event schema and provisions the index template and ingest
//! pipeline in OpenSearch. With `PROVISION_DRY_RUN=true` the requests are
//! printed to stdout instead and no connection is made.

use dotenv::dotenv;
use event_indexer::{provision, Dependencies, IndexerConfig, IndexingError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("event_indexer=info,event_index_repository=info"));

    let axiom_token = env::var("AXIOM_TOKEN").ok();

    if axiom_token.is_some() {
        // JSON output for log shipping
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(e.to_string()))?;

        info!(
            service_name = "event-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(e.to_string()))?;

        info!(
            service_name = "event-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

/// Print the provisioning requests without contacting the engine.
fn dry_run(config: &IndexerConfig) -> Result<(), IndexingError> {
    let schema = Dependencies::build_schema()?;
    let rendered = provision::render(config, &schema);
    let output = serde_json::to_string_pretty(&rendered)
        .map_err(|e| IndexingError::config(format!("Failed to render requests: {}", e)))?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    let config = IndexerConfig::from_env();

    if config.dry_run {
        info!("Dry run, rendering provisioning requests");
        return dry_run(&config);
    }

    info!("Starting event indexer");

    match Dependencies::from_config(&config).await {
        Ok(deps) => {
            info!(
                transform_mode = %deps.service.config().transform_mode,
                "Event index ready"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            Err(e)
        }
    }
}
