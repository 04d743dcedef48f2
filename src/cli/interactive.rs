//! Interactive CLI mode for the coverage report generator

use super::{print_error, print_outcome, print_placeholders, spinner, write_summary};
use crate::{generate_report, parse_target, prepare_report, ReportConfig, ReportRequest};
use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

/// Folders typed earlier in the session, offered again as defaults
#[derive(Debug, Default)]
struct SessionDefaults {
    data: Option<PathBuf>,
    charts_dir: String,
    images_dir: String,
    output_dir: String,
}

/// Files in the current directory with the given extension
fn find_nearby_files(extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(".") {
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if path.is_file()
                && !name.starts_with("~$")
                && path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
            {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Prompt for a file, listing matching files found nearby
fn prompt_for_file(prompt_text: &str, extension: &str, default: Option<&Path>) -> Result<PathBuf> {
    let nearby = find_nearby_files(extension);

    if nearby.is_empty() {
        let initial = default
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "./".to_string());
        let input_path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt_text)
            .with_initial_text(initial)
            .interact_text()?;
        return Ok(PathBuf::from(input_path));
    }

    let mut options: Vec<String> = nearby
        .iter()
        .map(|p| format!("📄 {} (detected)", p.display()))
        .collect();
    options.push("✏️  Enter custom path".to_string());

    let default_index = default
        .and_then(|d| nearby.iter().position(|p| p == d))
        .unwrap_or(0);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt_text)
        .items(&options)
        .default(default_index)
        .interact()?;

    if selection < nearby.len() {
        Ok(nearby[selection].clone())
    } else {
        let input_path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter file path")
            .with_initial_text("./")
            .interact_text()?;
        Ok(PathBuf::from(input_path))
    }
}

/// Optional folder; an empty answer skips the step
fn prompt_for_folder(prompt_text: &str, remembered: &mut String) -> Result<Option<PathBuf>> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt_text)
        .with_initial_text(remembered.clone())
        .allow_empty(true)
        .interact_text()?;
    let answer = answer.trim().to_string();
    *remembered = answer.clone();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

/// Run the interactive CLI mode
pub fn run_interactive_mode(config: &ReportConfig) -> Result<()> {
    print_banner();
    let mut session = SessionDefaults {
        output_dir: "./".to_string(),
        ..SessionDefaults::default()
    };

    loop {
        println!();
        let options = vec!["📝 Generate report", "🔍 Inspect template", "❌ Exit"];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => handle_generate(config, &mut session)?,
            1 => handle_inspect(config, &mut session)?,
            _ => {
                println!("\n{}", "Goodbye! 👋".green().bold());
                break;
            }
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "╔═══════════════════════════════════════════════════════════════╗".blue());
    println!("{}", "║                                                               ║".blue());
    println!("{}", "║     📡 Coverage Report Generator                              ║".blue().bold());
    println!("{}", "║                                                               ║".blue());
    println!("{}", "║     Fill measurement report templates from spreadsheet       ║".blue());
    println!("{}", "║     data, charts and header/footer images                    ║".blue());
    println!("{}", "║                                                               ║".blue());
    println!("{}", "╚═══════════════════════════════════════════════════════════════╝".blue());
}

fn handle_generate(config: &ReportConfig, session: &mut SessionDefaults) -> Result<()> {
    println!("\n{}", "=== Generate Report ===".blue().bold());
    println!();

    let data = prompt_for_file("📊 Select the coverage spreadsheet", "xlsx", session.data.as_deref())?;
    if !data.exists() {
        println!("{}", "❌ Error: Spreadsheet does not exist!".red().bold());
        return Ok(());
    }
    session.data = Some(data.clone());

    let template = prompt_for_file("📄 Select the report template", "docx", None)?;
    if !template.exists() {
        println!("{}", "❌ Error: Template does not exist!".red().bold());
        return Ok(());
    }

    let supervisor_index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("👷 Select the supervisor")
        .items(&config.supervisors)
        .default(0)
        .interact()?;
    let supervisor = config
        .supervisors
        .get(supervisor_index)
        .cloned()
        .unwrap_or_default();

    let charts_dir = prompt_for_folder(
        "📈 Folder with chart workbooks (empty to skip)",
        &mut session.charts_dir,
    )?;
    let images_dir = prompt_for_folder(
        "🖼️  Folder with header/footer images (empty to skip)",
        &mut session.images_dir,
    )?;

    let recommendations = if Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("✍️  Replace the recommendations section?")
        .default(false)
        .interact()?
    {
        let text: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Recommendations (use \\n for line breaks)")
            .interact_text()?;
        Some(text.replace("\\n", "\n"))
    } else {
        None
    };

    let output_dir = prompt_for_folder("📂 Output folder", &mut session.output_dir)?
        .unwrap_or_else(|| PathBuf::from("."));

    let summary = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("📄 Write a Markdown run summary?")
        .default(false)
        .interact()?;

    let request = ReportRequest {
        data_path: data,
        template_path: template,
        supervisor,
        charts_dir,
        images_dir,
        recommendations,
        output_dir,
    };

    println!();
    let progress = spinner("Generating report...");
    let result = generate_report(&request, config);
    progress.finish_and_clear();

    match result {
        Ok(outcome) => {
            print_outcome(&outcome);
            if summary {
                match write_summary(&outcome) {
                    Ok(path) => println!("  - Summary: {}", path.display()),
                    Err(e) => print_error("Failed to write summary", &e),
                }
            }
        }
        Err(e) => print_error("Report generation failed!", &e),
    }

    Ok(())
}

fn handle_inspect(config: &ReportConfig, session: &mut SessionDefaults) -> Result<()> {
    println!("\n{}", "=== Inspect Template ===".blue().bold());
    println!();

    let template = prompt_for_file("📄 Select the report template", "docx", None)?;
    match parse_target(&template) {
        Ok(target) => {
            println!("{}", "Target".bold());
            println!("  Locality:    {}", target.locality);
            println!("  Technology:  {}", target.technology);
            println!("  Operator:    {}", target.operator);
            println!("  Measurement: {}", target.measurement_type);
        }
        Err(e) => {
            print_error("Template name not recognised", &e);
            return Ok(());
        }
    }

    let with_data = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("📊 Look up the record in a spreadsheet?")
        .default(true)
        .interact()?;
    if !with_data {
        return Ok(());
    }

    let data = prompt_for_file("📊 Select the coverage spreadsheet", "xlsx", session.data.as_deref())?;
    session.data = Some(data.clone());

    let request = ReportRequest::new(data, template);
    match prepare_report(&request, config) {
        Ok(prepared) => {
            println!();
            if prepared.found.match_count > 1 {
                println!(
                    "{}",
                    format!("⚠️  {} rows match; the first one is used", prepared.found.match_count).yellow()
                );
            }
            print_placeholders(&prepared.placeholders);
        }
        Err(e) => print_error("Lookup failed", &e),
    }

    Ok(())
}
