//! Linear classifier artifacts stored as JSON.
//!
//! Covers the decision function of linear SVMs and logistic regression,
//! with an optional standard scaler applied first:
//!
//! ```json
//! {
//!   "kind": "linear",
//!   "coefficients": [0.31, 1.12, -0.2],
//!   "intercept": -0.78,
//!   "scaler": { "mean": [3.8, 120.9, 69.1], "scale": [3.4, 32.0, 19.4] },
//!   "threshold": 0.0
//! }
//! ```

use crate::error::ModelError;
use crate::models::predictor::Predictor;
use serde::{Deserialize, Serialize};

/// Standardization applied before the decision function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `label = 1` iff `w . x + b > threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    #[serde(default)]
    pub threshold: f64,
}

/// Every JSON artifact is tagged with its kind
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonArtifact {
    Linear(LinearModel),
}

impl LinearModel {
    /// Decode and check a JSON artifact
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, String> {
        let JsonArtifact::Linear(model) =
            serde_json::from_slice::<JsonArtifact>(bytes).map_err(|e| e.to_string())?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        if let Some(scaler) = &self.scaler {
            let width = self.coefficients.len();
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(format!(
                    "scaler dimensions ({} mean, {} scale) do not match {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    width
                ));
            }
            if let Some(index) = scaler.scale.iter().position(|&s| s == 0.0) {
                return Err(format!("scaler has zero scale at feature {index}"));
            }
        }
        Ok(())
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.coefficients.len() {
            return Err(ModelError::inference(format!(
                "X has {} features, but the model is expecting {} features as input",
                row.len(),
                self.coefficients.len()
            )));
        }
        if let Some(index) = row.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::inference(format!(
                "Input contains a non-finite value at feature {index}"
            )));
        }

        let dot: f64 = match &self.scaler {
            Some(scaler) => row
                .iter()
                .zip(&scaler.mean)
                .zip(&scaler.scale)
                .zip(&self.coefficients)
                .map(|(((x, mean), scale), w)| w * (x - mean) / scale)
                .sum(),
            None => row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| w * x)
                .sum(),
        };

        Ok(dot + self.intercept)
    }
}

impl Predictor for LinearModel {
    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ModelError> {
        rows.iter()
            .map(|row| {
                let score = self.decision_function(row)?;
                Ok(if score > self.threshold { 1 } else { 0 })
            })
            .collect()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(coefficients: Vec<f64>, intercept: f64) -> LinearModel {
        LinearModel {
            coefficients,
            intercept,
            scaler: None,
            threshold: 0.0,
        }
    }

    #[test]
    fn test_decision_function() {
        let m = model(vec![0.5, -1.0], 0.25);
        let score = m.decision_function(&[2.0, 1.0]).unwrap();
        assert!((score - 0.25).abs() < 1e-12);
        assert_eq!(m.predict_batch(&[vec![2.0, 1.0], vec![0.0, 1.0]]).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_scaler_is_applied() {
        let m = LinearModel {
            scaler: Some(StandardScaler {
                mean: vec![100.0],
                scale: vec![10.0],
            }),
            ..model(vec![1.0], 0.0)
        };
        assert_eq!(m.predict_batch(&[vec![110.0]]).unwrap(), vec![1]);
        assert_eq!(m.predict_batch(&[vec![90.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_wrong_width_is_inference_failure() {
        let m = model(vec![1.0, 1.0, 1.0], 0.0);
        let err = m.predict_batch(&[vec![1.0]]).unwrap_err();
        assert!(matches!(err, ModelError::InferenceFailure(_)));
        assert!(err.to_string().contains("expecting 3 features"));
    }

    #[test]
    fn test_non_finite_is_inference_failure() {
        let m = model(vec![1.0, 1.0], 0.0);
        let err = m.predict_batch(&[vec![1.0, f64::INFINITY]]).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_from_json_slice() {
        let json = br#"{"kind":"linear","coefficients":[0.1,0.2],"intercept":-0.5}"#;
        let m = LinearModel::from_json_slice(json).unwrap();
        assert_eq!(m.coefficients, vec![0.1, 0.2]);
        assert_eq!(m.threshold, 0.0);
        assert_eq!(m.input_width(), Some(2));
    }

    #[test]
    fn test_from_json_rejects_bad_artifacts() {
        assert!(LinearModel::from_json_slice(br#"{"kind":"linear","coeffic"#).is_err());
        assert!(LinearModel::from_json_slice(br#"{"kind":"forest","trees":[]}"#).is_err());
        assert!(
            LinearModel::from_json_slice(br#"{"kind":"linear","coefficients":[],"intercept":0}"#)
                .is_err()
        );

        let err = LinearModel::from_json_slice(
            br#"{"kind":"linear","coefficients":[1,2],"intercept":0,
                 "scaler":{"mean":[0],"scale":[1,1]}}"#,
        )
        .unwrap_err();
        assert!(err.contains("scaler dimensions"));

        let err = LinearModel::from_json_slice(
            br#"{"kind":"linear","coefficients":[1],"intercept":0,
                 "scaler":{"mean":[0],"scale":[0]}}"#,
        )
        .unwrap_err();
        assert!(err.contains("zero scale"));
    }
}
