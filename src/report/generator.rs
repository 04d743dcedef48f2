//! Markdown run summary

use crate::models::ReportOutcome;
use anyhow::Result;
use std::path::Path;

fn asset_line(report: &mut String, label: &str, path: Option<&Path>) {
    match path {
        Some(path) => report.push_str(&format!("- **{}**: {}\n", label, path.display())),
        None => report.push_str(&format!("- **{}**: not inserted\n", label)),
    }
}

pub fn generate_markdown_summary(outcome: &ReportOutcome) -> Result<String> {
    let mut report = String::new();

    report.push_str("# Coverage Report Generation Summary\n\n");

    // Summary
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Locality**: {}\n", outcome.target.locality));
    report.push_str(&format!("- **Technology**: {}\n", outcome.target.technology));
    report.push_str(&format!("- **Operator**: {}\n", outcome.target.operator));
    report.push_str(&format!("- **Measurement Type**: {}\n", outcome.target.measurement_type));
    report.push_str(&format!("- **Report Number**: {}\n", outcome.record.report_number));
    report.push_str(&format!("- **Output**: {}\n", outcome.output_path.display()));
    report.push_str(&format!(
        "- **Status**: {}\n\n",
        if outcome.warnings.is_empty() { "✅ Complete" } else { "⚠️ Complete with warnings" }
    ));

    // Record
    report.push_str("## Record\n\n");
    report.push_str("| Field | Value |\n|---|---|\n");
    let record = &outcome.record;
    for (field, value) in [
        ("Province", record.province.clone()),
        ("Canton", record.canton.clone()),
        ("Schedule date", record.schedule_date.to_string()),
        ("Report date", record.report_date.to_string()),
        ("Measured value", record.measured_value.clone()),
        ("Operator coverage", record.operator_coverage.clone()),
        ("Meets target (ARCOTEL)", record.meets_target_arcotel.clone()),
        ("Meets target (operator)", record.meets_target_operator.clone()),
    ] {
        report.push_str(&format!("| {} | {} |\n", field, value));
    }
    report.push('\n');

    // Substitutions
    report.push_str("## Substitutions\n\n");
    report.push_str(&format!("- **Placeholders replaced**: {}\n", outcome.fill.replacements));
    report.push_str(&format!(
        "- **Schedule dates resolved**: {}\n",
        outcome.fill.schedule_dates_resolved
    ));
    report.push_str(&format!(
        "- **Supervisor replacements**: {}\n",
        outcome.fill.supervisor_replacements
    ));
    report.push_str(&format!("- **Split placeholders merged**: {}\n\n", outcome.fill.merged_runs));

    // Assets
    report.push_str("## Inserted Assets\n\n");
    asset_line(&mut report, "Chart", outcome.assets.chart_workbook.as_deref());
    asset_line(&mut report, "Header image", outcome.assets.header_image.as_deref());
    asset_line(&mut report, "Footer image", outcome.assets.footer_image.as_deref());
    asset_line(&mut report, "Correction map", outcome.assets.correction_image.as_deref());
    report.push_str(&format!(
        "- **Margins adjusted**: {}\n",
        if outcome.assets.margins_adjusted { "yes" } else { "no" }
    ));
    report.push_str(&format!(
        "- **Recommendations replaced**: {}\n\n",
        if outcome.assets.recommendations_replaced { "yes" } else { "no" }
    ));

    // Warnings
    if !outcome.warnings.is_empty() {
        report.push_str("## ⚠️ Warnings\n\n");
        for warning in &outcome.warnings {
            report.push_str(&format!("- {}\n", warning));
        }
        report.push('\n');
    }

    // Notes
    if !outcome.notes.is_empty() {
        report.push_str("## ℹ️ Notes\n\n");
        for note in &outcome.notes {
            report.push_str(&format!("- {}\n", note));
        }
        report.push('\n');
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, FillSummary, InsertedAssets, MeasurementRecord, ReportTarget};
    use std::path::PathBuf;

    fn outcome() -> ReportOutcome {
        ReportOutcome {
            target: ReportTarget {
                locality: "TUMBACO".to_string(),
                technology: "4G".to_string(),
                operator: "CONECEL S.A.".to_string(),
                measurement_type: "DT".to_string(),
            },
            record: MeasurementRecord {
                locality: "TUMBACO".to_string(),
                canton: "QUITO".to_string(),
                province: "PICHINCHA".to_string(),
                operator: "CONECEL S.A.".to_string(),
                schedule_date: CellValue::Empty,
                report_number: "IT-1".to_string(),
                report_date: CellValue::Empty,
                total_samples_arcotel: String::new(),
                valid_samples_arcotel: String::new(),
                valid_speed_samples_arcotel: String::new(),
                requires_map_change_arcotel: String::new(),
                measured_value: "97.5".to_string(),
                operator_coverage: String::new(),
                meets_target_arcotel: String::new(),
                valid_samples_pct_operator: String::new(),
                meets_target_operator: String::new(),
                requires_map_change_operator: String::new(),
            },
            output_path: PathBuf::from("out/IT-1_TUMBACO_4G_CONECEL_DT.docx"),
            fill: FillSummary {
                replacements: 12,
                ..FillSummary::default()
            },
            assets: InsertedAssets {
                chart_workbook: Some(PathBuf::from("charts/Tumbaco.xlsx")),
                ..InsertedAssets::default()
            },
            warnings: vec!["Header image not found".to_string()],
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_summary_sections() {
        let report = generate_markdown_summary(&outcome()).unwrap();
        assert!(report.starts_with("# Coverage Report Generation Summary"));
        assert!(report.contains("- **Report Number**: IT-1"));
        assert!(report.contains("- **Placeholders replaced**: 12"));
        assert!(report.contains("- **Chart**: charts/Tumbaco.xlsx"));
        assert!(report.contains("- **Header image**: not inserted"));
        assert!(report.contains("## ⚠️ Warnings\n\n- Header image not found"));
        assert!(!report.contains("## ℹ️ Notes"));
    }
}
