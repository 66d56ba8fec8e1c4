//! Error types for model loading, inference and request handling

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading or invoking a predictor.
///
/// The store catches the artifact variants and the gateway catches
/// `InferenceFailure`; neither escapes to the front-end as an `Err`.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model file absent at the expected path
    #[error("File not found: {}", .path.display())]
    MissingArtifact { path: PathBuf },

    /// File present but not usable as a predictor
    #[error("{message}")]
    CorruptArtifact { path: PathBuf, message: String },

    /// Predictor invocation failed
    #[error("{0}")]
    InferenceFailure(String),
}

impl ModelError {
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ModelError::CorruptArtifact {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        ModelError::InferenceFailure(message.into())
    }
}

/// A named input field violates its form constraint
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        value: f64,
    },

    #[error("{field} must be one of {allowed:?}, got {value}")]
    NotAllowed {
        field: &'static str,
        allowed: &'static [f64],
        value: f64,
    },
}

/// Failure reading a request line from the front-end input stream
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_message_includes_path() {
        let err = ModelError::MissingArtifact {
            path: PathBuf::from("saved_models/diabetes_model.json"),
        };
        assert_eq!(
            err.to_string(),
            "File not found: saved_models/diabetes_model.json"
        );
    }

    #[test]
    fn test_corrupt_artifact_message_is_underlying_message() {
        let err = ModelError::corrupt("m.json", "EOF while parsing a value");
        assert_eq!(err.to_string(), "EOF while parsing a value");
    }

    #[test]
    fn test_input_error_messages() {
        let err = InputError::BelowMinimum {
            field: "glucose",
            min: 0.0,
            value: -1.0,
        };
        assert_eq!(err.to_string(), "glucose must be at least 0, got -1");
    }
}
