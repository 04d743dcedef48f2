//! Result of one report run

use super::{MeasurementRecord, ReportTarget};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillSummary {
    pub replacements: usize,
    pub schedule_dates_resolved: usize,
    pub schedule_dates_unresolved: usize,
    pub supervisor_replacements: usize,
    pub merged_runs: usize,
}

impl FillSummary {
    pub fn total_changes(&self) -> usize {
        self.replacements + self.schedule_dates_resolved + self.supervisor_replacements
    }
}

/// Assets placed into the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsertedAssets {
    /// Workbook the chart came from
    pub chart_workbook: Option<PathBuf>,
    pub header_image: Option<PathBuf>,
    pub footer_image: Option<PathBuf>,
    pub correction_image: Option<PathBuf>,
    pub margins_adjusted: bool,
    pub recommendations_replaced: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub target: ReportTarget,
    pub record: MeasurementRecord,
    pub output_path: PathBuf,
    pub fill: FillSummary,
    pub assets: InsertedAssets,
    /// Non-fatal problems the user should look at
    pub warnings: Vec<String>,
    /// Informational messages (skipped steps)
    pub notes: Vec<String>,
}

impl ReportOutcome {
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }
}
