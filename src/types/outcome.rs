//! Prediction labels and outcomes

use serde::{Deserialize, Serialize};

/// Binary classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Code 0
    Absent,
    /// Code 1
    Present,
}

impl Label {
    /// Map a raw class code; anything other than 0 or 1 is rejected
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Label::Absent),
            1 => Some(Label::Present),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Label::Absent => 0,
            Label::Present => 1,
        }
    }
}

/// Result of one gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Label(Label),
    Failure(String),
}

impl PredictionOutcome {
    pub fn label(&self) -> Option<Label> {
        match self {
            PredictionOutcome::Label(label) => Some(*label),
            PredictionOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Label(_) => None,
            PredictionOutcome::Failure(message) => Some(message.as_str()),
        }
    }
}
