//! Multiple Disease Prediction - Main Entry Point
//!
//! Loads the three classifiers, logs their status, then answers JSON-lines
//! diagnosis requests from stdin with JSON-lines reports on stdout.

use anyhow::Result;
use disease_prediction::{
    config::{AppConfig, LogFormat, LoggingConfig},
    consumer::RequestConsumer,
    error::RequestError,
    models::{ArtifactInfo, ModelStore},
    producer::ReportProducer,
    service::DiagnosisService,
};
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let config_found = Path::new(AppConfig::DEFAULT_PATH).exists();
    let config = if config_found {
        AppConfig::load()?
    } else {
        AppConfig::default()
    };

    init_logging(&config.logging)?;

    info!("Starting Multiple Disease Prediction");
    if config_found {
        info!(path = AppConfig::DEFAULT_PATH, "Configuration loaded");
    } else {
        warn!(path = AppConfig::DEFAULT_PATH, "Configuration file not found, using defaults");
    }

    // Load every model once; failures only disable their own disease
    let store = ModelStore::load_all(&config.models);
    log_model_status(&store);

    let service = DiagnosisService::new(store);
    let metrics = service.metrics().clone();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let consumer = RequestConsumer::new(stdin.lock());
    let mut producer = ReportProducer::new(stdout.lock());

    info!("Waiting for diagnosis requests on stdin");

    for request in consumer {
        match request {
            Ok(input) => {
                let report = service.diagnose(&input);
                if let Err(e) = producer.publish(&report) {
                    error!(report_id = %report.report_id, error = %e, "Failed to write diagnosis report");
                    break;
                }
            }
            Err(RequestError::Malformed { line, source }) => {
                metrics.record_malformed();
                warn!(line, error = %source, "Failed to parse diagnosis request");
            }
            Err(e @ RequestError::Io(_)) => {
                error!(error = %e, "Request stream failed");
                break;
            }
        }
    }

    info!("Input closed, shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("disease_prediction={}", logging.level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }

    Ok(())
}

/// Startup diagnostics: one line per model plus every recorded load failure
fn log_model_status(store: &ModelStore) {
    for (disease, handle) in store.handles() {
        let info = ArtifactInfo::describe(handle.artifact_info());
        if handle.is_loaded() {
            info!(
                disease = %disease,
                model = %handle.name(),
                status = %handle.status(),
                artifact = %info,
                "Model status"
            );
        } else {
            warn!(
                disease = %disease,
                model = %handle.name(),
                status = %handle.status(),
                artifact = %info,
                "Model status"
            );
        }
    }

    for (file_name, detail) in store.errors().iter() {
        warn!(model = %file_name, error = %detail, "Model load error");
    }
}
