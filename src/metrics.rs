//! Session statistics for the diagnosis front-end.

use crate::types::disease::Disease;
use crate::types::report::{DiagnosisReport, DiagnosisStatus};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Per-disease report counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiseaseCounts {
    pub positive: u64,
    pub negative: u64,
    pub failed: u64,
    pub not_loaded: u64,
    pub invalid: u64,
}

impl DiseaseCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.failed + self.not_loaded + self.invalid
    }
}

/// Metrics collector for a front-end session
pub struct SessionMetrics {
    /// Total requests answered
    pub requests: AtomicU64,
    /// Request lines that could not be parsed
    pub malformed: AtomicU64,
    /// Report counts by disease
    by_disease: RwLock<BTreeMap<Disease, DiseaseCounts>>,
    /// Inference times (in microseconds)
    inference_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl SessionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
            by_disease: RwLock::new(BTreeMap::new()),
            inference_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record an answered request
    pub fn record_report(&self, report: &DiagnosisReport) {
        self.requests.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_disease) = self.by_disease.write() {
            let counts = by_disease.entry(report.disease).or_default();
            match report.status {
                DiagnosisStatus::Positive => counts.positive += 1,
                DiagnosisStatus::Negative => counts.negative += 1,
                DiagnosisStatus::PredictionFailed => counts.failed += 1,
                DiagnosisStatus::ModelNotLoaded => counts.not_loaded += 1,
                DiagnosisStatus::InvalidInput => counts.invalid += 1,
            }
        }
    }

    /// Record the time spent inside one gateway call
    pub fn record_inference_time(&self, duration: Duration) {
        if let Ok(mut times) = self.inference_times.write() {
            times.push(duration.as_micros() as u64);
            // Keep only last 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a request line that failed to parse
    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counts(&self, disease: Disease) -> DiseaseCounts {
        self.by_disease
            .read()
            .ok()
            .and_then(|by_disease| by_disease.get(&disease).copied())
            .unwrap_or_default()
    }

    /// Get inference time statistics
    pub fn get_inference_stats(&self) -> InferenceStats {
        let Ok(times) = self.inference_times.read() else {
            return InferenceStats::default();
        };
        if times.is_empty() {
            return InferenceStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        InferenceStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let requests = self.requests.load(Ordering::Relaxed);
        let malformed = self.malformed.load(Ordering::Relaxed);
        let inference = self.get_inference_stats();
        let elapsed = self.start_time.elapsed();

        info!(
            requests,
            malformed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Session summary"
        );
        for disease in Disease::ALL {
            let counts = self.counts(disease);
            if counts.total() == 0 {
                continue;
            }
            info!(
                disease = %disease,
                positive = counts.positive,
                negative = counts.negative,
                failed = counts.failed,
                not_loaded = counts.not_loaded,
                invalid = counts.invalid,
                "Reports by disease"
            );
        }
        if inference.count > 0 {
            info!(
                calls = inference.count,
                mean_us = inference.mean_us,
                p50_us = inference.p50_us,
                p99_us = inference.p99_us,
                max_us = inference.max_us,
                "Inference times"
            );
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference time statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::outcome::Label;

    #[test]
    fn test_report_recording() {
        let metrics = SessionMetrics::new();

        metrics.record_report(&DiagnosisReport::verdict(Disease::Diabetes, Label::Present));
        metrics.record_report(&DiagnosisReport::verdict(Disease::Diabetes, Label::Absent));
        metrics.record_report(&DiagnosisReport::not_loaded(Disease::Heart));
        metrics.record_malformed();

        assert_eq!(metrics.requests.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.malformed.load(Ordering::Relaxed), 1);

        let diabetes = metrics.counts(Disease::Diabetes);
        assert_eq!(diabetes.positive, 1);
        assert_eq!(diabetes.negative, 1);
        assert_eq!(metrics.counts(Disease::Heart).not_loaded, 1);
        assert_eq!(metrics.counts(Disease::Parkinsons).total(), 0);
    }

    #[test]
    fn test_inference_stats() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.get_inference_stats(), InferenceStats::default());

        for us in [100, 200, 300] {
            metrics.record_inference_time(Duration::from_micros(us));
        }

        let stats = metrics.get_inference_stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.p50_us, 200);
        assert_eq!(stats.max_us, 300);
    }
}
