//! Terminal front-end shared by the binary and interactive mode

pub mod interactive;

pub use interactive::run_interactive_mode;

use crate::models::PlaceholderMap;
use crate::{report, ReportOutcome};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Spinner shown while the pipeline runs
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn print_outcome(outcome: &ReportOutcome) {
    println!("{}", "✅ Report generated successfully!".green().bold());
    println!();
    println!("📊 Summary:");
    println!("  - Target: {}", outcome.target);
    println!("  - Report number: {}", outcome.record.report_number);
    println!("  - Placeholders replaced: {}", outcome.fill.total_changes());
    if let Some(workbook) = &outcome.assets.chart_workbook {
        println!("  - Chart from: {}", workbook.display());
    }
    if outcome.assets.margins_adjusted {
        println!("  - Header/footer images replaced, margins adjusted");
    }
    if let Some(image) = &outcome.assets.correction_image {
        println!("  - Correction map: {}", image.display());
    }
    println!("  - Output: {}", outcome.output_path.display().to_string().cyan());

    if !outcome.warnings.is_empty() {
        println!();
        println!("{}", "⚠️  Warnings:".yellow().bold());
        for warning in &outcome.warnings {
            println!("  - {}", warning);
        }
    }

    if !outcome.notes.is_empty() {
        println!();
        for note in &outcome.notes {
            println!("  {} {}", "ℹ️".dimmed(), note.dimmed());
        }
    }
}

/// Write the Markdown summary next to the output document
pub fn write_summary(outcome: &ReportOutcome) -> Result<PathBuf> {
    let path = outcome.output_path.with_extension("md");
    let content = report::generate_report_summary(outcome)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub fn print_placeholders(map: &PlaceholderMap) {
    println!("{}", "Placeholders".bold());
    for (token, value) in map.iter() {
        println!("  {} → {}", token.cyan(), value);
    }
    println!(
        "  {} → {} | {} | {}",
        crate::models::tokens::SCHEDULE_DATE.cyan(),
        map.schedule.antecedentes,
        map.schedule.pruebas_realizadas,
        map.schedule.conclusiones
    );
}

pub fn print_error(context: &str, error: &anyhow::Error) {
    eprintln!("{}", format!("❌ {}", context).red().bold());
    eprintln!("{}", format!("Error: {:#}", error).red());
}
