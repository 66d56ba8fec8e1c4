//! Diagnosis service: the call site in front of the prediction gateway

use crate::features::PatientInput;
use crate::metrics::SessionMetrics;
use crate::models::inference;
use crate::models::store::ModelStore;
use crate::types::outcome::PredictionOutcome;
use crate::types::report::DiagnosisReport;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Turns patient records into rendered diagnosis reports
pub struct DiagnosisService {
    store: ModelStore,
    metrics: Arc<SessionMetrics>,
}

impl DiagnosisService {
    pub fn new(store: ModelStore) -> Self {
        Self::with_metrics(store, Arc::new(SessionMetrics::new()))
    }

    pub fn with_metrics(store: ModelStore, metrics: Arc<SessionMetrics>) -> Self {
        Self { store, metrics }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.metrics
    }

    /// Validate, guard on the model handle, predict and render.
    ///
    /// Never fails: every problem ends up in the report's status and
    /// message, and no request is retried or routed to another model.
    pub fn diagnose(&self, input: &PatientInput) -> DiagnosisReport {
        let report = self.run(input);
        self.metrics.record_report(&report);
        report
    }

    fn run(&self, input: &PatientInput) -> DiagnosisReport {
        let disease = input.disease();

        if let Err(e) = input.validate() {
            warn!(disease = %disease, error = %e, "Rejected invalid input");
            return DiagnosisReport::invalid_input(disease, &e.to_string());
        }

        let Some(predictor) = self
            .store
            .handle(disease)
            .and_then(|handle| handle.predictor())
        else {
            warn!(disease = %disease, "Prediction requested for a model that is not loaded");
            return DiagnosisReport::not_loaded(disease);
        };

        let features = input.to_features();
        let started = Instant::now();
        let outcome = inference::predict(predictor, &features);
        self.metrics.record_inference_time(started.elapsed());

        match outcome {
            PredictionOutcome::Label(label) => {
                debug!(disease = %disease, label = label.code(), "Diagnosis rendered");
                DiagnosisReport::verdict(disease, label)
            }
            PredictionOutcome::Failure(message) => {
                DiagnosisReport::prediction_failed(disease, &message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::features::{DiabetesInput, HeartInput};
    use crate::models::handle::ModelHandle;
    use crate::models::predictor::Predictor;
    use crate::models::registry::LoadErrorRegistry;
    use crate::types::disease::Disease;
    use crate::types::report::DiagnosisStatus;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        code: i64,
        calls: Arc<AtomicUsize>,
    }

    impl Predictor for Counting {
        fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![self.code; rows.len()])
        }

        fn kind(&self) -> &'static str {
            "counting"
        }
    }

    fn service_with(code: i64, calls: Arc<AtomicUsize>) -> DiagnosisService {
        let mut errors = LoadErrorRegistry::new();
        let missing = ModelError::MissingArtifact {
            path: PathBuf::from("saved_models/heart_disease_model.json"),
        };
        errors.record("heart_disease_model.json", missing.to_string());

        let store = ModelStore::from_handles(
            [
                (
                    Disease::Diabetes,
                    ModelHandle::loaded(
                        "diabetes_model.json",
                        "saved_models/diabetes_model.json",
                        Arc::new(Counting { code, calls }),
                    ),
                ),
                (
                    Disease::Heart,
                    ModelHandle::failed(
                        "heart_disease_model.json",
                        "saved_models/heart_disease_model.json",
                        &missing,
                    ),
                ),
            ],
            errors,
        );
        DiagnosisService::new(store)
    }

    #[test]
    fn test_positive_and_negative_verdicts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let input = PatientInput::Diabetes(DiabetesInput::default());

        let report = service_with(1, calls.clone()).diagnose(&input);
        assert_eq!(report.status, DiagnosisStatus::Positive);
        assert_eq!(report.message, "The person is diabetic");

        let report = service_with(0, calls.clone()).diagnose(&input);
        assert_eq!(report.status, DiagnosisStatus::Negative);
        assert_eq!(report.message, "The person is not diabetic");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_not_loaded_guard_skips_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = service_with(1, calls.clone());

        let report = service.diagnose(&PatientInput::Heart(HeartInput::default()));
        assert_eq!(report.status, DiagnosisStatus::ModelNotLoaded);
        assert_eq!(
            report.message,
            "Heart disease model is not loaded. Check sidebar for details."
        );

        // No handle at all behaves the same
        let report = service.diagnose(&PatientInput::default_for(Disease::Parkinsons));
        assert_eq!(report.status, DiagnosisStatus::ModelNotLoaded);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_input_skips_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = service_with(1, calls.clone());

        let input = PatientInput::Diabetes(DiabetesInput {
            age: -1.0,
            ..DiabetesInput::default()
        });
        let report = service.diagnose(&input);

        assert_eq!(report.status, DiagnosisStatus::InvalidInput);
        assert_eq!(report.message, "Invalid input: age must be at least 0, got -1");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_binary_label_is_reported() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = service_with(7, calls);

        let report = service.diagnose(&PatientInput::Diabetes(DiabetesInput::default()));
        assert_eq!(report.status, DiagnosisStatus::PredictionFailed);
        assert_eq!(
            report.message,
            "Model prediction failed: predictor returned non-binary label 7"
        );
    }

    #[test]
    fn test_metrics_follow_reports() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = service_with(1, calls);

        service.diagnose(&PatientInput::Diabetes(DiabetesInput::default()));
        service.diagnose(&PatientInput::Heart(HeartInput::default()));

        assert_eq!(service.metrics().counts(Disease::Diabetes).positive, 1);
        assert_eq!(service.metrics().counts(Disease::Heart).not_loaded, 1);
        assert_eq!(service.metrics().get_inference_stats().count, 1);
    }
}
