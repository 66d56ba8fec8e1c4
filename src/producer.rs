//! JSON-lines producer for diagnosis reports

use crate::types::report::DiagnosisReport;
use anyhow::Result;
use std::io::Write;
use tracing::debug;

/// Writes one JSON report per line
pub struct ReportProducer<W> {
    writer: W,
}

impl<W: Write> ReportProducer<W> {
    /// Create a new report producer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Publish a diagnosis report
    pub fn publish(&mut self, report: &DiagnosisReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        debug!(
            report_id = %report.report_id,
            disease = %report.disease,
            status = ?report.status,
            "Published diagnosis report"
        );

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
