//! Type definitions shared across the store, gateway and front-end

pub mod disease;
pub mod outcome;
pub mod report;

pub use disease::Disease;
pub use outcome::{Label, PredictionOutcome};
pub use report::{DiagnosisReport, DiagnosisStatus};
