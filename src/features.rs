//! Named input schemas and their positional feature vectors.
//!
//! Each schema mirrors one prediction form. Fields are validated by name
//! and only then flattened, in the exact column order the classifier was
//! trained on, into a [`FeatureVector`].

use crate::error::InputError;
use crate::types::disease::Disease;
use serde::{Deserialize, Serialize};

/// Ordered model input. Order must match the training-time column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-row batch, the shape predictors consume
    pub fn to_batch(&self) -> Vec<Vec<f64>> {
        vec![self.0.clone()]
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// A named-field input record for one disease
pub trait FeatureSchema {
    const DISEASE: Disease;

    /// Training column names, in feature vector order
    const FEATURE_NAMES: &'static [&'static str];

    /// Check the form constraints of every field
    fn validate(&self) -> Result<(), InputError>;

    /// Flatten into training column order
    fn to_features(&self) -> FeatureVector;
}

fn finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field, value })
    }
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if value < min {
        return Err(InputError::BelowMinimum { field, min, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    at_least(field, value, 0.0)
}

fn one_of(field: &'static str, value: f64, allowed: &'static [f64]) -> Result<(), InputError> {
    finite(field, value)?;
    if !allowed.contains(&value) {
        return Err(InputError::NotAllowed {
            field,
            allowed,
            value,
        });
    }
    Ok(())
}

const BINARY: &[f64] = &[0.0, 1.0];
const THAL_CODES: &[f64] = &[0.0, 1.0, 2.0];

/// Diabetes form (Pima Indians columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiabetesInput {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl Default for DiabetesInput {
    fn default() -> Self {
        Self {
            pregnancies: 2.0,
            glucose: 120.0,
            blood_pressure: 70.0,
            skin_thickness: 20.0,
            insulin: 79.0,
            bmi: 28.0,
            diabetes_pedigree_function: 0.5,
            age: 45.0,
        }
    }
}

impl FeatureSchema for DiabetesInput {
    const DISEASE: Disease = Disease::Diabetes;

    const FEATURE_NAMES: &'static [&'static str] = &[
        "Pregnancies",
        "Glucose",
        "BloodPressure",
        "SkinThickness",
        "Insulin",
        "BMI",
        "DiabetesPedigreeFunction",
        "Age",
    ];

    fn validate(&self) -> Result<(), InputError> {
        non_negative("pregnancies", self.pregnancies)?;
        non_negative("glucose", self.glucose)?;
        non_negative("blood_pressure", self.blood_pressure)?;
        non_negative("skin_thickness", self.skin_thickness)?;
        non_negative("insulin", self.insulin)?;
        non_negative("bmi", self.bmi)?;
        non_negative("diabetes_pedigree_function", self.diabetes_pedigree_function)?;
        non_negative("age", self.age)
    }

    fn to_features(&self) -> FeatureVector {
        FeatureVector(vec![
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ])
    }
}

/// Heart disease form (Cleveland columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeartInput {
    pub age: f64,
    /// 0 = female, 1 = male
    pub sex: f64,
    /// Chest pain type (0-3)
    pub cp: f64,
    /// Resting blood pressure
    pub trestbps: f64,
    /// Serum cholesterol (mg/dl)
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dl
    pub fbs: f64,
    /// Resting ECG result
    pub restecg: f64,
    /// Maximum heart rate achieved
    pub thalach: f64,
    /// Exercise induced angina
    pub exang: f64,
    /// ST depression induced by exercise
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment
    pub slope: f64,
    /// Major vessels colored by fluoroscopy
    pub ca: f64,
    /// 0 = normal, 1 = fixed defect, 2 = reversible defect
    pub thal: f64,
}

impl Default for HeartInput {
    fn default() -> Self {
        Self {
            age: 54.0,
            sex: 1.0,
            cp: 3.0,
            trestbps: 130.0,
            chol: 250.0,
            fbs: 0.0,
            restecg: 1.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 1.0,
            slope: 2.0,
            ca: 0.0,
            thal: 2.0,
        }
    }
}

impl FeatureSchema for HeartInput {
    const DISEASE: Disease = Disease::Heart;

    const FEATURE_NAMES: &'static [&'static str] = &[
        "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
        "slope", "ca", "thal",
    ];

    fn validate(&self) -> Result<(), InputError> {
        non_negative("age", self.age)?;
        one_of("sex", self.sex, BINARY)?;
        non_negative("cp", self.cp)?;
        non_negative("trestbps", self.trestbps)?;
        non_negative("chol", self.chol)?;
        one_of("fbs", self.fbs, BINARY)?;
        non_negative("restecg", self.restecg)?;
        non_negative("thalach", self.thalach)?;
        one_of("exang", self.exang, BINARY)?;
        non_negative("oldpeak", self.oldpeak)?;
        non_negative("slope", self.slope)?;
        non_negative("ca", self.ca)?;
        one_of("thal", self.thal, THAL_CODES)
    }

    fn to_features(&self) -> FeatureVector {
        FeatureVector(vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ])
    }
}

/// Parkinson's voice-measurement form (Oxford dataset columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParkinsonsInput {
    pub fo: f64,
    pub fhi: f64,
    pub flo: f64,
    pub jitter_percent: f64,
    pub jitter_abs: f64,
    pub rap: f64,
    pub ppq: f64,
    pub ddp: f64,
    pub shimmer: f64,
    pub shimmer_db: f64,
    pub apq3: f64,
    pub apq5: f64,
    pub apq: f64,
    pub dda: f64,
    pub nhr: f64,
    pub hnr: f64,
    pub rpde: f64,
    pub dfa: f64,
    pub spread1: f64,
    /// Falls back to [`ParkinsonsInput::SPREAD2_FALLBACK`] when absent
    pub spread2: Option<f64>,
    pub d2: f64,
    pub ppe: f64,
}

impl ParkinsonsInput {
    pub const SPREAD2_FALLBACK: f64 = 2.0;
}

impl Default for ParkinsonsInput {
    fn default() -> Self {
        Self {
            fo: 119.992,
            fhi: 157.302,
            flo: 74.997,
            jitter_percent: 0.00784,
            jitter_abs: 0.00007,
            rap: 0.00370,
            ppq: 0.00401,
            ddp: 0.00631,
            shimmer: 0.24,
            shimmer_db: 2.0,
            apq3: 0.11,
            apq5: 0.16,
            apq: 0.14,
            dda: 0.17,
            nhr: 0.022,
            hnr: 21.0,
            rpde: 0.65,
            dfa: 0.71,
            spread1: -4.0,
            spread2: Some(Self::SPREAD2_FALLBACK),
            d2: 2.1,
            ppe: 0.2,
        }
    }
}

impl FeatureSchema for ParkinsonsInput {
    const DISEASE: Disease = Disease::Parkinsons;

    const FEATURE_NAMES: &'static [&'static str] = &[
        "MDVP:Fo(Hz)",
        "MDVP:Fhi(Hz)",
        "MDVP:Flo(Hz)",
        "MDVP:Jitter(%)",
        "MDVP:Jitter(Abs)",
        "MDVP:RAP",
        "MDVP:PPQ",
        "Jitter:DDP",
        "MDVP:Shimmer",
        "MDVP:Shimmer(dB)",
        "Shimmer:APQ3",
        "Shimmer:APQ5",
        "MDVP:APQ",
        "Shimmer:DDA",
        "NHR",
        "HNR",
        "RPDE",
        "DFA",
        "spread1",
        "spread2",
        "D2",
        "PPE",
    ];

    fn validate(&self) -> Result<(), InputError> {
        let bounded = [
            ("fo", self.fo),
            ("fhi", self.fhi),
            ("flo", self.flo),
            ("jitter_percent", self.jitter_percent),
            ("jitter_abs", self.jitter_abs),
            ("rap", self.rap),
            ("ppq", self.ppq),
            ("ddp", self.ddp),
            ("shimmer", self.shimmer),
            ("shimmer_db", self.shimmer_db),
            ("apq3", self.apq3),
            ("apq5", self.apq5),
            ("apq", self.apq),
            ("dda", self.dda),
            ("nhr", self.nhr),
            ("hnr", self.hnr),
            ("rpde", self.rpde),
            ("dfa", self.dfa),
            ("d2", self.d2),
            ("ppe", self.ppe),
        ];
        for (field, value) in bounded {
            non_negative(field, value)?;
        }

        // spread1 and spread2 are log-scale measures and may be negative
        finite("spread1", self.spread1)?;
        if let Some(spread2) = self.spread2 {
            finite("spread2", spread2)?;
        }
        Ok(())
    }

    fn to_features(&self) -> FeatureVector {
        FeatureVector(vec![
            self.fo,
            self.fhi,
            self.flo,
            self.jitter_percent,
            self.jitter_abs,
            self.rap,
            self.ppq,
            self.ddp,
            self.shimmer,
            self.shimmer_db,
            self.apq3,
            self.apq5,
            self.apq,
            self.dda,
            self.nhr,
            self.hnr,
            self.rpde,
            self.dfa,
            self.spread1,
            self.spread2.unwrap_or(Self::SPREAD2_FALLBACK),
            self.d2,
            self.ppe,
        ])
    }
}

/// A diagnosis request as submitted by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "disease", rename_all = "lowercase")]
pub enum PatientInput {
    Diabetes(DiabetesInput),
    Heart(HeartInput),
    Parkinsons(ParkinsonsInput),
}

impl PatientInput {
    pub fn disease(&self) -> Disease {
        match self {
            PatientInput::Diabetes(_) => DiabetesInput::DISEASE,
            PatientInput::Heart(_) => HeartInput::DISEASE,
            PatientInput::Parkinsons(_) => ParkinsonsInput::DISEASE,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        match self {
            PatientInput::Diabetes(input) => input.validate(),
            PatientInput::Heart(input) => input.validate(),
            PatientInput::Parkinsons(input) => input.validate(),
        }
    }

    pub fn to_features(&self) -> FeatureVector {
        match self {
            PatientInput::Diabetes(input) => input.to_features(),
            PatientInput::Heart(input) => input.to_features(),
            PatientInput::Parkinsons(input) => input.to_features(),
        }
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            PatientInput::Diabetes(_) => DiabetesInput::FEATURE_NAMES,
            PatientInput::Heart(_) => HeartInput::FEATURE_NAMES,
            PatientInput::Parkinsons(_) => ParkinsonsInput::FEATURE_NAMES,
        }
    }

    /// Form defaults for a disease
    pub fn default_for(disease: Disease) -> Self {
        match disease {
            Disease::Diabetes => PatientInput::Diabetes(DiabetesInput::default()),
            Disease::Heart => PatientInput::Heart(HeartInput::default()),
            Disease::Parkinsons => PatientInput::Parkinsons(ParkinsonsInput::default()),
        }
    }
}
