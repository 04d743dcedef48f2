//! Run summary generation

pub mod generator;

use crate::models::ReportOutcome;
use anyhow::Result;

pub fn generate_report_summary(outcome: &ReportOutcome) -> Result<String> {
    generator::generate_markdown_summary(outcome)
}
