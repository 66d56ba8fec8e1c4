//! ONNX classifier adapter

use crate::error::ModelError;
use crate::models::predictor::Predictor;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// ONNX Runtime session wrapped as a [`Predictor`]
pub struct OnnxPredictor {
    /// Session; running it needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
}

impl OnnxPredictor {
    /// Load an ONNX classifier from file
    pub fn load(path: &Path, onnx_threads: usize) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        info!(
            path = %path.display(),
            input = %input_name,
            outputs = session.outputs.len(),
            threads = onnx_threads,
            "ONNX session ready"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    fn run(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != width) {
            anyhow::bail!("ragged batch: rows have differing feature counts");
        }

        // Prepare input tensor - shape [rows, num_features]
        let shape = vec![rows.len() as i64, width as i64];
        let data: Vec<f32> = rows.iter().flatten().map(|&v| v as f32).collect();
        let input_tensor =
            Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = lock_session(&self.session);

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        extract_labels(&outputs, rows.len())
    }
}

/// Take the session lock, recovering it if a panicking run poisoned it.
///
/// A failed run leaves no partial state in the session.
fn lock_session<T>(session: &Mutex<T>) -> MutexGuard<'_, T> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read class codes from the session outputs.
///
/// scikit-learn exports emit an int64 `label` tensor; other exporters only
/// give scores, in which case the arg-max column is the class.
fn extract_labels(outputs: &ort::session::SessionOutputs, rows: usize) -> Result<Vec<i64>> {
    for (name, output) in outputs.iter() {
        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            debug!(output = %name, "Labels read from integer tensor");
            return Ok(data.iter().take(rows).copied().collect());
        }
    }

    for (name, output) in outputs.iter() {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            let columns = match dims.as_slice() {
                [_, columns] => (*columns).max(1) as usize,
                _ => 1,
            };
            debug!(output = %name, columns, "Labels derived from score tensor");
            return Ok(data
                .chunks(columns)
                .take(rows)
                .map(label_from_scores)
                .collect());
        }
    }

    anyhow::bail!("model produced no label or score tensor")
}

fn label_from_scores(scores: &[f32]) -> i64 {
    match scores {
        [probability] => i64::from(*probability > 0.5),
        _ => scores
            .iter()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |best, (i, &s)| {
                if s > best.1 {
                    (i, s)
                } else {
                    best
                }
            })
            .0 as i64,
    }
}

impl Predictor for OnnxPredictor {
    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ModelError> {
        self.run(rows)
            .map_err(|e| ModelError::inference(format!("{e:#}")))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_survives_poisoning() {
        let session = Mutex::new(vec![1_i64]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = session.lock().unwrap();
            guard.push(-1);
            panic!("run failed")
        }));
        assert!(result.is_err());
        assert!(session.is_poisoned());

        lock_session(&session).push(0);
        assert_eq!(*lock_session(&session), vec![1, -1, 0]);
    }

    #[test]
    fn test_label_from_probability_columns() {
        assert_eq!(label_from_scores(&[0.2, 0.8]), 1);
        assert_eq!(label_from_scores(&[0.9, 0.1]), 0);
    }

    #[test]
    fn test_label_from_single_probability() {
        assert_eq!(label_from_scores(&[0.7]), 1);
        assert_eq!(label_from_scores(&[0.3]), 0);
    }
}
