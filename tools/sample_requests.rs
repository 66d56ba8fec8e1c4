//! Sample Request Generator
//!
//! Writes randomized diagnosis requests, one JSON object per line, for
//! piping into the `disease-prediction` front-end.

use disease_prediction::features::{DiabetesInput, HeartInput, ParkinsonsInput, PatientInput};
use disease_prediction::Disease;
use rand::Rng;
use std::io::{self, Write};
use tracing::info;

/// Request generator jittering around the form defaults
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Multiply a default by a random factor in [1 - spread, 1 + spread]
    fn jitter(&mut self, value: f64, spread: f64) -> f64 {
        value * self.rng.gen_range(1.0 - spread..=1.0 + spread)
    }

    fn generate_diabetes(&mut self) -> DiabetesInput {
        let d = DiabetesInput::default();
        DiabetesInput {
            pregnancies: self.rng.gen_range(0..=10) as f64,
            glucose: self.rng.gen_range(70..=200) as f64,
            blood_pressure: self.rng.gen_range(50..=100) as f64,
            skin_thickness: self.jitter(d.skin_thickness, 0.5).round(),
            insulin: self.jitter(d.insulin, 0.8),
            bmi: self.rng.gen_range(18.0..=45.0),
            diabetes_pedigree_function: self.rng.gen_range(0.08..=2.4),
            age: self.rng.gen_range(21..=80) as f64,
        }
    }

    fn generate_heart(&mut self) -> HeartInput {
        HeartInput {
            age: self.rng.gen_range(29..=77) as f64,
            sex: self.rng.gen_range(0..=1) as f64,
            cp: self.rng.gen_range(0..=3) as f64,
            trestbps: self.rng.gen_range(94..=200) as f64,
            chol: self.rng.gen_range(126..=564) as f64,
            fbs: self.rng.gen_bool(0.15) as u8 as f64,
            restecg: self.rng.gen_range(0..=2) as f64,
            thalach: self.rng.gen_range(71..=202) as f64,
            exang: self.rng.gen_bool(0.3) as u8 as f64,
            oldpeak: (self.rng.gen_range(0.0..=6.2_f64) * 10.0).round() / 10.0,
            slope: self.rng.gen_range(0..=2) as f64,
            ca: self.rng.gen_range(0..=3) as f64,
            thal: self.rng.gen_range(0..=2) as f64,
        }
    }

    fn generate_parkinsons(&mut self) -> ParkinsonsInput {
        let d = ParkinsonsInput::default();
        ParkinsonsInput {
            fo: self.jitter(d.fo, 0.3),
            fhi: self.jitter(d.fhi, 0.3),
            flo: self.jitter(d.flo, 0.3),
            jitter_percent: self.jitter(d.jitter_percent, 0.5),
            jitter_abs: self.jitter(d.jitter_abs, 0.5),
            rap: self.jitter(d.rap, 0.5),
            ppq: self.jitter(d.ppq, 0.5),
            ddp: self.jitter(d.ddp, 0.5),
            shimmer: self.jitter(d.shimmer, 0.5),
            shimmer_db: self.jitter(d.shimmer_db, 0.5),
            apq3: self.jitter(d.apq3, 0.5),
            apq5: self.jitter(d.apq5, 0.5),
            apq: self.jitter(d.apq, 0.5),
            dda: self.jitter(d.dda, 0.5),
            nhr: self.jitter(d.nhr, 0.5),
            hnr: self.jitter(d.hnr, 0.3),
            rpde: self.jitter(d.rpde, 0.2),
            dfa: self.jitter(d.dfa, 0.1),
            spread1: self.jitter(d.spread1, 0.4),
            // Leave spread2 out now and then to exercise the fallback
            spread2: if self.rng.gen_bool(0.1) {
                None
            } else {
                Some(self.jitter(2.0, 0.4))
            },
            d2: self.jitter(d.d2, 0.3),
            ppe: self.jitter(d.ppe, 0.5),
        }
    }

    fn generate(&mut self, disease: Disease) -> PatientInput {
        match disease {
            Disease::Diabetes => PatientInput::Diabetes(self.generate_diabetes()),
            Disease::Heart => PatientInput::Heart(self.generate_heart()),
            Disease::Parkinsons => PatientInput::Parkinsons(self.generate_parkinsons()),
        }
    }

    fn random_disease(&mut self) -> Disease {
        Disease::ALL[self.rng.gen_range(0..Disease::ALL.len())]
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_requests=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    // Parse arguments: [count] [disease]
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let only: Option<Disease> = match args.get(2) {
        Some(name) => Some(serde_json::from_value(serde_json::Value::String(name.clone()))?),
        None => None,
    };

    info!(count, disease = ?only, "Generating sample requests");

    let mut generator = RequestGenerator::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for _ in 0..count {
        let disease = match only {
            Some(disease) => disease,
            None => generator.random_disease(),
        };
        let request = generator.generate(disease);
        serde_json::to_writer(&mut out, &request)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!(count, "Completed");

    Ok(())
}
