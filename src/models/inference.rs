//! Prediction gateway: one feature vector in, one outcome out

use crate::error::ModelError;
use crate::features::FeatureVector;
use crate::models::predictor::Predictor;
use crate::types::outcome::{Label, PredictionOutcome};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Invoke a loaded predictor on a single feature vector.
///
/// Precondition: the predictor comes from a loaded handle
/// ([`ModelHandle::predictor`](crate::models::ModelHandle::predictor)).
/// Checking that is the caller's job; this function never sees a handle.
///
/// Every failure, including a panic inside the predictor, is returned as
/// [`PredictionOutcome::Failure`]. Feature values are passed through
/// unchecked.
pub fn predict(predictor: &dyn Predictor, features: &FeatureVector) -> PredictionOutcome {
    match run_single_row(predictor, features) {
        Ok(label) => {
            debug!(
                backend = predictor.kind(),
                features = features.len(),
                label = label.code(),
                "Prediction complete"
            );
            PredictionOutcome::Label(label)
        }
        Err(e) => {
            error!(backend = predictor.kind(), error = %e, "Model prediction failed");
            PredictionOutcome::Failure(e.to_string())
        }
    }
}

fn run_single_row(predictor: &dyn Predictor, features: &FeatureVector) -> Result<Label, ModelError> {
    let batch = features.to_batch();

    let codes = panic::catch_unwind(AssertUnwindSafe(|| predictor.predict_batch(&batch)))
        .map_err(|payload| {
            ModelError::inference(format!("predictor panicked: {}", panic_message(&*payload)))
        })??;

    let code = codes
        .first()
        .copied()
        .ok_or_else(|| ModelError::inference("predictor returned no label"))?;

    Label::from_code(code)
        .ok_or_else(|| ModelError::inference(format!("predictor returned non-binary label {code}")))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
