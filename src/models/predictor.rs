//! Predictor capability shared by every artifact format

use crate::error::ModelError;

/// Anything that can label a batch of feature rows.
///
/// Implementations return one class code per input row. The gateway only
/// ever sends single-row batches, but the interface stays batch-shaped like
/// the runtimes behind it.
pub trait Predictor: Send + Sync {
    /// Run inference on a batch of feature rows
    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ModelError>;

    /// Short backend identifier for diagnostics
    fn kind(&self) -> &'static str;

    /// Number of features per row, when the artifact declares it
    fn input_width(&self) -> Option<usize> {
        None
    }
}
