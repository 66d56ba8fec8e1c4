//! Disease catalogue: feature widths and verdict strings

use crate::types::outcome::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three supported classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    Diabetes,
    Heart,
    Parkinsons,
}

impl Disease {
    pub const ALL: [Disease; 3] = [Disease::Diabetes, Disease::Heart, Disease::Parkinsons];

    /// Number of features the model was trained on
    pub fn feature_count(self) -> usize {
        match self {
            Disease::Diabetes => 8,
            Disease::Heart => 13,
            Disease::Parkinsons => 22,
        }
    }

    /// Page title shown by the front-end
    pub fn title(self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes Prediction using ML",
            Disease::Heart => "Heart Disease Prediction using ML",
            Disease::Parkinsons => "Parkinson's Disease Prediction using ML",
        }
    }

    /// Human-readable verdict for a predicted label
    pub fn verdict(self, label: Label) -> &'static str {
        match (self, label) {
            (Disease::Diabetes, Label::Present) => "The person is diabetic",
            (Disease::Diabetes, Label::Absent) => "The person is not diabetic",
            (Disease::Heart, Label::Present) => "The person is having heart disease",
            (Disease::Heart, Label::Absent) => "The person does not have any heart disease",
            (Disease::Parkinsons, Label::Present) => "The person has Parkinson's disease",
            (Disease::Parkinsons, Label::Absent) => "The person does not have Parkinson's disease",
        }
    }

    /// Message shown when the disease's model failed to load
    pub fn not_loaded_message(self) -> String {
        let subject = match self {
            Disease::Diabetes => "Diabetes",
            Disease::Heart => "Heart disease",
            Disease::Parkinsons => "Parkinsons",
        };
        format!("{subject} model is not loaded. Check sidebar for details.")
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Disease::Diabetes => "diabetes",
            Disease::Heart => "heart",
            Disease::Parkinsons => "parkinsons",
        };
        f.write_str(name)
    }
}
