//! Coverage Report Generator
//!
//! Fills coverage-measurement report templates (.docx) with one row of a
//! measurement spreadsheet, inserts the coverage chart taken from the
//! locality's chart workbook, swaps header/footer banners and page margins,
//! and writes `<report number>_<template name>`.

pub mod assets;
pub mod config;
pub mod models;
pub mod ooxml;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod transformer;
pub mod utils;
pub mod validator;
#[cfg(feature = "cli")]
pub mod cli;

pub use config::ReportConfig;
pub use models::{ReportError, ReportOutcome, ReportTarget};

use anyhow::{Context, Result};
use assets::RunWorkspace;
use models::{InsertedAssets, PlaceholderMap, SupervisorRule, TEMPLATE_SUPERVISOR};
use ooxml::{DocxDocument, HeaderFooterKind, PictureSource};
use parser::RecordMatch;
use resolver::Locale;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Inputs of one report run
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub data_path: PathBuf,
    pub template_path: PathBuf,
    pub supervisor: String,
    /// Folder with the per-locality chart workbooks
    pub charts_dir: Option<PathBuf>,
    /// Folder with the header/footer banners and correction maps
    pub images_dir: Option<PathBuf>,
    /// Free text for the recommendations block
    pub recommendations: Option<String>,
    pub output_dir: PathBuf,
}

impl ReportRequest {
    pub fn new(data_path: impl Into<PathBuf>, template_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            template_path: template_path.into(),
            supervisor: TEMPLATE_SUPERVISOR.to_string(),
            charts_dir: None,
            images_dir: None,
            recommendations: None,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Everything known before the template is touched
#[derive(Debug, Clone)]
pub struct PreparedReport {
    pub template_name: String,
    pub target: ReportTarget,
    pub found: RecordMatch,
    pub placeholders: PlaceholderMap,
}

fn template_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse the template filename into its target
pub fn parse_target(template_path: &Path) -> Result<ReportTarget> {
    let name = template_name(template_path);
    parser::parse_report_filename(&name).ok_or_else(|| ReportError::InvalidFilename(name).into())
}

/// Parse the filename, look up the record and resolve the placeholders
pub fn prepare_report(request: &ReportRequest, config: &ReportConfig) -> Result<PreparedReport> {
    let target = parse_target(&request.template_path)?;
    info!(%target, "report target");

    let table = parser::load_coverage_table(&request.data_path, &config.data_sheet)?;
    validator::validate_columns(&table)?;
    let found = parser::lookup_record(&table, &target)?;
    let placeholders = resolver::build_placeholders(&found.record, &Locale::SPANISH);

    Ok(PreparedReport {
        template_name: template_name(&request.template_path),
        target,
        found,
        placeholders,
    })
}

/// Run the whole pipeline and write the output document.
///
/// Hard failures (bad filename, missing sheet or columns, no record) return
/// an error before anything is written. Asset problems become warnings.
pub fn generate_report(request: &ReportRequest, config: &ReportConfig) -> Result<ReportOutcome> {
    let prepared = prepare_report(request, config)?;
    let workspace = RunWorkspace::new()?;
    let staged = workspace.stage_template(&request.template_path)?;
    let mut doc = DocxDocument::open(&staged)?;

    let output_name =
        utils::output_file_name(&prepared.found.record.report_number, &prepared.template_name);
    let mut outcome = ReportOutcome {
        target: prepared.target.clone(),
        record: prepared.found.record.clone(),
        output_path: request.output_dir.join(output_name),
        fill: Default::default(),
        assets: InsertedAssets::default(),
        warnings: Vec::new(),
        notes: Vec::new(),
    };

    if prepared.found.match_count > 1 {
        outcome.add_warning(format!(
            "{} rows match {}; using the first one",
            prepared.found.match_count, prepared.target
        ));
    }

    let rule = SupervisorRule::new(request.supervisor.as_str());
    if !config.supervisors.iter().any(|s| *s == rule.selected) {
        outcome.add_warning(format!("Supervisor '{}' is not in the known list", rule.selected));
    }

    outcome.fill = transformer::fill_document(&mut doc, &prepared.placeholders, &rule)?;
    if outcome.fill.schedule_dates_unresolved > 0 {
        outcome.add_warning(format!(
            "Schedule date placeholder found {} more time(s) than expected; left unchanged",
            outcome.fill.schedule_dates_unresolved
        ));
    }

    if let Some(text) = &request.recommendations {
        let recommendations = &config.recommendations;
        if transformer::replace_recommendations(
            &mut doc,
            text,
            &recommendations.heading,
            &recommendations.sentinel,
        )? {
            outcome.assets.recommendations_replaced = true;
        } else {
            outcome.add_warning(format!(
                "Section '{}' not found; recommendations not inserted",
                recommendations.heading
            ));
        }
    }

    match &request.charts_dir {
        Some(dir) => {
            let inserted = insert_chart_from(
                &mut doc,
                dir,
                &prepared.target,
                config,
                &workspace,
                &mut outcome.assets,
            );
            if let Err(e) = inserted {
                warn!("chart not inserted: {:#}", e);
                outcome.add_warning(format!("Chart not inserted: {:#}", e));
            }
        }
        None => outcome.add_note("No charts folder given; chart skipped"),
    }

    match &request.images_dir {
        Some(dir) => {
            if let Err(e) = apply_banners(&mut doc, dir, config, &mut outcome.assets) {
                warn!("banners not replaced: {:#}", e);
                outcome.add_warning(format!("Header/footer images not replaced: {:#}", e));
            }
            match insert_correction_from(&mut doc, dir, &prepared.target, config, &mut outcome.assets) {
                Ok(true) => {}
                Ok(false) => outcome.add_note(format!(
                    "No correction map for {} in {}",
                    prepared.target.locality,
                    dir.display()
                )),
                Err(e) => outcome.add_warning(format!("Correction map not inserted: {:#}", e)),
            }
        }
        None => outcome.add_note("No images folder given; header/footer images kept"),
    }

    for token in validator::leftover_placeholders(&doc) {
        outcome.add_warning(format!("Placeholder {} was not replaced", token));
    }

    fs::create_dir_all(&request.output_dir)
        .with_context(|| format!("Failed to create {}", request.output_dir.display()))?;
    doc.save(&outcome.output_path)?;
    info!(output = %outcome.output_path.display(), "report written");

    Ok(outcome)
}

fn insert_chart_from(
    doc: &mut DocxDocument,
    dir: &Path,
    target: &ReportTarget,
    config: &ReportConfig,
    workspace: &RunWorkspace,
    assets: &mut InsertedAssets,
) -> Result<()> {
    let chart = assets::locate_chart(
        dir,
        &target.locality,
        &config.chart_sheet,
        config.chart_image_index,
        workspace,
    )?;
    let picture = PictureSource::from_path(&chart.image_path)?;
    transformer::insert_chart(
        doc,
        &picture,
        &config.results_anchor(&target.operator),
        config.chart_width_inches,
    )?;
    assets.chart_workbook = Some(chart.workbook);
    Ok(())
}

/// Both banners are required; margins change only when they are swapped
fn apply_banners(
    doc: &mut DocxDocument,
    dir: &Path,
    config: &ReportConfig,
    assets: &mut InsertedAssets,
) -> Result<()> {
    let banners = assets::find_banner_images(dir, &config.header_image, &config.footer_image)?;
    let (Some(header), Some(footer)) = (banners.header, banners.footer) else {
        return Err(ReportError::AssetNotFound {
            pattern: format!("{} + {}", config.header_image, config.footer_image),
            dir: dir.to_path_buf(),
        }
        .into());
    };

    let header_picture = PictureSource::from_path(&header)?;
    let footer_picture = PictureSource::from_path(&footer)?;
    let width = config.banner_width_inches;
    transformer::replace_banner_images(doc, HeaderFooterKind::Header, &header_picture, width)?;
    transformer::replace_banner_images(doc, HeaderFooterKind::Footer, &footer_picture, width)?;
    transformer::adjust_margins(doc, &config.margins);

    assets.header_image = Some(header);
    assets.footer_image = Some(footer);
    assets.margins_adjusted = true;
    Ok(())
}

fn insert_correction_from(
    doc: &mut DocxDocument,
    dir: &Path,
    target: &ReportTarget,
    config: &ReportConfig,
    assets: &mut InsertedAssets,
) -> Result<bool> {
    let excluded = [config.header_image.as_str(), config.footer_image.as_str()];
    let Some(path) = assets::find_correction_image(dir, &target.locality, &excluded)? else {
        return Ok(false);
    };
    let picture = PictureSource::from_path(&path)?;
    transformer::insert_correction_image(doc, &picture, &config.correction)?;
    assets.correction_image = Some(path);
    Ok(true)
}
