//! Coverage Report Generator CLI

use clap::{Parser, Subcommand};
use colored::*;
use coverage_report::cli::{
    print_error, print_outcome, print_placeholders, run_interactive_mode, spinner, write_summary,
};
use coverage_report::models::TEMPLATE_SUPERVISOR;
use coverage_report::{generate_report, parse_target, prepare_report, ReportConfig, ReportRequest};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coverage-report")]
#[command(about = "Fill coverage-measurement report templates from spreadsheet data", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file overriding sheet names, anchors and layout constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report from a template and the coverage spreadsheet
    Generate {
        /// Spreadsheet with the COBERTURA sheet
        #[arg(short, long)]
        data: PathBuf,

        /// Template named LOCALITY_NG_OPERATOR_TYPE.docx
        #[arg(short, long)]
        template: PathBuf,

        /// Supervisor printed in the signature table
        #[arg(short, long, default_value = TEMPLATE_SUPERVISOR)]
        supervisor: String,

        /// Folder with the per-locality chart workbooks
        #[arg(long)]
        charts_dir: Option<PathBuf>,

        /// Folder with encabezado.png, "pie de pagina.png" and correction maps
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Text file whose content replaces the recommendations section
        #[arg(long)]
        recommendations: Option<PathBuf>,

        /// Where the filled report is written
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Also write a Markdown run summary next to the report
        #[arg(long)]
        summary: bool,
    },

    /// Show what a template resolves to without writing anything
    Inspect {
        #[arg(short, long)]
        template: PathBuf,

        /// Look up the record and resolve placeholders
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Guided prompts
    Interactive,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match ReportConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error("Invalid configuration!", &e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Generate {
            data,
            template,
            supervisor,
            charts_dir,
            images_dir,
            recommendations,
            output_dir,
            summary,
        } => {
            println!("{}", "Coverage Report Generator".bold().blue());
            println!("{}", "=".repeat(50).blue());
            println!();

            let recommendations = match recommendations.map(std::fs::read_to_string).transpose() {
                Ok(text) => text,
                Err(e) => {
                    print_error("Failed to read recommendations file!", &anyhow::Error::from(e));
                    std::process::exit(1);
                }
            };

            let request = ReportRequest {
                data_path: data,
                template_path: template,
                supervisor,
                charts_dir,
                images_dir,
                recommendations,
                output_dir,
            };

            let progress = spinner("Generating report...");
            let result = generate_report(&request, &config);
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
                Err(e) => {
                    print_error("Report generation failed!", &e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Inspect { template, data, json } => {
            let target = match parse_target(&template) {
                Ok(target) => target,
                Err(e) => {
                    print_error("Template name not recognised!", &e);
                    std::process::exit(1);
                }
            };

            let Some(data) = data else {
                if json {
                    println!("{}", json!({ "target": target }));
                } else {
                    println!("{}", "📋 Target".bold().blue());
                    println!("  Locality:    {}", target.locality);
                    println!("  Technology:  {}", target.technology);
                    println!("  Operator:    {}", target.operator);
                    println!("  Measurement: {}", target.measurement_type);
                }
                return;
            };

            let request = ReportRequest::new(data, template);
            match prepare_report(&request, &config) {
                Ok(prepared) => {
                    if json {
                        let value = json!({
                            "target": prepared.target,
                            "record": prepared.found.record,
                            "match_count": prepared.found.match_count,
                            "placeholders": prepared.placeholders,
                        });
                        match serde_json::to_string_pretty(&value) {
                            Ok(text) => println!("{}", text),
                            Err(e) => {
                                print_error("Failed to serialize", &anyhow::Error::from(e));
                                std::process::exit(1);
                            }
                        }
                    } else {
                        println!("{}", "📋 Target".bold().blue());
                        println!("  {}", prepared.target);
                        println!("  Report number: {}", prepared.found.record.report_number);
                        if prepared.found.match_count > 1 {
                            println!(
                                "{}",
                                format!(
                                    "⚠️  {} rows match; the first one is used",
                                    prepared.found.match_count
                                )
                                .yellow()
                            );
                        }
                        println!();
                        print_placeholders(&prepared.placeholders);
                    }
                }
                Err(e) => {
                    print_error("Lookup failed!", &e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Interactive => {
            if let Err(e) = run_interactive_mode(&config) {
                print_error("Interactive mode failed!", &e);
                std::process::exit(1);
            }
        }
    }
}
