//! Chart extraction from the per-locality workbook
//!
//! Pictures of a worksheet live in its drawing part:
//! `xl/workbook.xml` → sheet relationship → `xl/worksheets/sheetN.xml` →
//! drawing relationship → `xl/drawings/drawingN.xml` → image relationships
//! → `xl/media/*`.

use super::workspace::RunWorkspace;
use crate::models::ReportError;
use crate::ooxml::relationships::{
    rels_path_for, resolve_target, Relationships, REL_DRAWING, REL_OFFICE_DOCUMENT,
};
use crate::ooxml::{Element, OpcPackage, XmlDocument};
use crate::utils::{contains_ignore_case, has_extension, is_lock_file};
use anyhow::{Context, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// A picture embedded in a worksheet, in drawing order
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub part: String,
    pub data: Vec<u8>,
}

/// The chart picked for a report
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub workbook: PathBuf,
    /// PNG written inside the run workspace
    pub image_path: PathBuf,
}

/// First `.xlsx` in `dir` (by name) whose file name contains the locality
pub fn find_chart_workbook(dir: &Path, locality: &str) -> Result<Option<PathBuf>> {
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || is_lock_file(path) || !has_extension(path, &["xlsx"]) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if contains_ignore_case(&name, locality) {
            debug!(path = %path.display(), "chart workbook found");
            return Ok(Some(path.to_path_buf()));
        }
    }
    Ok(None)
}

/// Pictures of the named sheet, in the order the drawing lists them
pub fn sheet_images(path: &Path, sheet: &str) -> Result<Vec<EmbeddedImage>> {
    let package = OpcPackage::open(path)?;

    let workbook_part = match package.read("_rels/.rels") {
        Some(bytes) => Relationships::parse(bytes)?
            .first_of_type(REL_OFFICE_DOCUMENT)
            .map(|r| resolve_target("", &r.target))
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_string()),
        None => DEFAULT_WORKBOOK_PART.to_string(),
    };
    let workbook = XmlDocument::parse(package.require(&workbook_part)?)
        .with_context(|| format!("Failed to parse {}", workbook_part))?;
    let workbook_rels = part_relationships(&package, &workbook_part)?;

    let sheet_not_found = || ReportError::SheetNotFound {
        sheet: sheet.to_string(),
        path: path.to_path_buf(),
    };

    let mut rel_id = None;
    workbook.root.walk(&mut |e| {
        if rel_id.is_none() && e.local_name() == "sheet" && e.attr("name") == Some(sheet) {
            rel_id = e.attr("r:id").map(str::to_string);
        }
    });
    let sheet_part = rel_id
        .and_then(|id| workbook_rels.get(&id))
        .map(|r| resolve_target(&workbook_part, &r.target))
        .ok_or_else(sheet_not_found)?;

    let Some(drawing) = part_relationships(&package, &sheet_part)?.first_of_type(REL_DRAWING) else {
        debug!(sheet, "sheet has no drawing");
        return Ok(Vec::new());
    };
    let drawing_part = resolve_target(&sheet_part, &drawing.target);
    let drawing_xml = XmlDocument::parse(package.require(&drawing_part)?)
        .with_context(|| format!("Failed to parse {}", drawing_part))?;
    let drawing_rels = part_relationships(&package, &drawing_part)?;

    let mut images = Vec::new();
    for embed in picture_embeds(&drawing_xml.root) {
        let Some(rel) = drawing_rels.get(&embed) else {
            continue;
        };
        let part = resolve_target(&drawing_part, &rel.target);
        if let Some(data) = package.read(&part) {
            images.push(EmbeddedImage {
                part,
                data: data.to_vec(),
            });
        }
    }
    debug!(sheet, images = images.len(), "sheet pictures listed");
    Ok(images)
}

fn part_relationships(package: &OpcPackage, part: &str) -> Result<Relationships> {
    match package.read(&rels_path_for(part)) {
        Some(bytes) => Relationships::parse(bytes),
        None => Ok(Relationships::empty()),
    }
}

/// Anchor kinds in the order pictures are listed: absolute, one-cell, two-cell
const ANCHOR_ORDER: [&str; 3] = ["absoluteAnchor", "oneCellAnchor", "twoCellAnchor"];

/// `r:embed` ids of the pictures anchored directly on the drawing.
///
/// Anchors are grouped by kind (see `ANCHOR_ORDER`), document order within a
/// kind. Pictures nested in group shapes are not listed.
fn picture_embeds(root: &Element) -> Vec<String> {
    ANCHOR_ORDER
        .iter()
        .flat_map(|kind| root.elements().filter(move |e| e.local_name() == *kind))
        .filter_map(|anchor| anchor.elements().find(|e| e.local_name() == "pic"))
        .filter_map(blip_embed)
        .collect()
}

fn blip_embed(pic: &Element) -> Option<String> {
    let mut embed = None;
    pic.walk(&mut |e| {
        if embed.is_none() && e.local_name() == "blip" {
            embed = e
                .attributes
                .iter()
                .find(|(k, _)| k == "r:embed" || k.ends_with(":embed"))
                .map(|(_, v)| v.clone());
        }
    });
    embed
}

/// Find the locality's workbook and persist its chart picture as PNG
pub fn locate_chart(
    charts_dir: &Path,
    locality: &str,
    sheet: &str,
    image_index: usize,
    workspace: &RunWorkspace,
) -> Result<ChartImage> {
    let workbook = find_chart_workbook(charts_dir, locality)?.ok_or_else(|| {
        ReportError::AssetNotFound {
            pattern: format!("*{}*.xlsx", locality),
            dir: charts_dir.to_path_buf(),
        }
    })?;

    let images = sheet_images(&workbook, sheet)?;
    let Some(picture) = images.get(image_index) else {
        return Err(ReportError::InsufficientImages {
            sheet: sheet.to_string(),
            found: images.len(),
            required: image_index + 1,
        }
        .into());
    };

    let decoded = image::load_from_memory(&picture.data)
        .with_context(|| format!("Failed to decode {} in {}", picture.part, workbook.display()))?;
    let image_path = workspace.chart_image_path(locality);
    decoded
        .save_with_format(&image_path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", image_path.display()))?;

    info!(workbook = %workbook.display(), part = %picture.part, "chart extracted");
    Ok(ChartImage {
        workbook,
        image_path,
    })
}
