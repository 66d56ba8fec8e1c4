//! Multiple Disease Prediction Library
//!
//! Loads the diabetes, heart disease and Parkinson's classifiers once at
//! startup and turns per-request patient records into rendered diagnoses,
//! with every load or inference failure reported instead of raised.

pub mod config;
pub mod consumer;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod service;
pub mod types;

pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{InputError, ModelError, RequestError};
pub use features::{FeatureVector, PatientInput};
pub use models::{LoadErrorRegistry, ModelHandle, ModelStore, Predictor};
pub use producer::ReportProducer;
pub use service::DiagnosisService;
pub use types::{DiagnosisReport, Disease, Label, PredictionOutcome};
