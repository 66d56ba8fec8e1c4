//! Diagnosis report returned to the front-end

use crate::types::disease::Disease;
use crate::types::outcome::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a diagnosis request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStatus {
    /// Model predicted the disease is present
    Positive,
    /// Model predicted the disease is absent
    Negative,
    /// Model for this disease failed to load
    ModelNotLoaded,
    /// Inference raised; message carries the cause
    PredictionFailed,
    /// Input record rejected before a feature vector was built
    InvalidInput,
}

/// One rendered answer to a diagnosis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Unique report identifier
    pub report_id: String,

    /// Disease the request was for
    pub disease: Disease,

    pub status: DiagnosisStatus,

    /// Raw label code, present only for positive/negative reports
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<u8>,

    /// Verdict or error message for display
    pub message: String,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl DiagnosisReport {
    fn new(disease: Disease, status: DiagnosisStatus, label: Option<u8>, message: String) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            disease,
            status,
            label,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Report for a successful prediction, rendered with the disease's verdict
    pub fn verdict(disease: Disease, label: Label) -> Self {
        let status = match label {
            Label::Present => DiagnosisStatus::Positive,
            Label::Absent => DiagnosisStatus::Negative,
        };
        Self::new(
            disease,
            status,
            Some(label.code()),
            disease.verdict(label).to_string(),
        )
    }

    pub fn not_loaded(disease: Disease) -> Self {
        Self::new(
            disease,
            DiagnosisStatus::ModelNotLoaded,
            None,
            disease.not_loaded_message(),
        )
    }

    pub fn prediction_failed(disease: Disease, cause: &str) -> Self {
        Self::new(
            disease,
            DiagnosisStatus::PredictionFailed,
            None,
            format!("Model prediction failed: {cause}"),
        )
    }

    pub fn invalid_input(disease: Disease, cause: &str) -> Self {
        Self::new(
            disease,
            DiagnosisStatus::InvalidInput,
            None,
            format!("Invalid input: {cause}"),
        )
    }

    pub fn is_verdict(&self) -> bool {
        matches!(
            self.status,
            DiagnosisStatus::Positive | DiagnosisStatus::Negative
        )
    }
}
