//! Run configuration: sheet names, asset names, anchors and layout constants

use crate::models::KNOWN_SUPERVISORS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Sheet holding the measurement rows
    pub data_sheet: String,
    /// Sheet of the chart workbook whose pictures hold the coverage map
    pub chart_sheet: String,
    /// Zero-based picture index within the chart sheet
    pub chart_image_index: usize,
    pub chart_width_inches: f64,
    pub header_image: String,
    pub footer_image: String,
    pub banner_width_inches: f64,
    pub margins: MarginsCm,
    /// Followed by a space and the operator, e.g. `RESULTADOS CONECEL S.A.`
    pub results_anchor_prefix: String,
    pub correction: CorrectionConfig,
    pub recommendations: RecommendationsConfig,
    pub supervisors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginsCm {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub anchor: String,
    pub caption_label: String,
    pub caption_text: String,
    pub width_inches: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationsConfig {
    pub heading: String,
    /// Paragraph that ends the recommendations block
    pub sentinel: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_sheet: "COBERTURA".to_string(),
            chart_sheet: "MAPAS SMA-QoS-9".to_string(),
            chart_image_index: 1,
            chart_width_inches: 6.0,
            header_image: "encabezado.png".to_string(),
            footer_image: "pie de pagina.png".to_string(),
            banner_width_inches: 6.0,
            margins: MarginsCm::default(),
            results_anchor_prefix: "RESULTADOS".to_string(),
            correction: CorrectionConfig::default(),
            recommendations: RecommendationsConfig::default(),
            supervisors: KNOWN_SUPERVISORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for MarginsCm {
    fn default() -> Self {
        Self {
            top: 4.0,
            bottom: 2.54,
            left: 2.54,
            right: 2.54,
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            anchor: "MAPA DE COBERTURA CORREGIDO".to_string(),
            caption_label: "Figura:".to_string(),
            caption_text: " Mapa de cobertura corregido con las mediciones de campo.".to_string(),
            width_inches: 6.0,
        }
    }
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            heading: "RECOMENDACIONES".to_string(),
            sentinel: "Elaborado por".to_string(),
        }
    }
}

impl ReportConfig {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Anchor paragraph text for the chart of `operator`
    pub fn results_anchor(&self, operator: &str) -> String {
        format!("{} {}", self.results_anchor_prefix, operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"chart_sheet": "MAPAS", "margins": {{"top": 3.0}}}}"#).unwrap();

        let config = ReportConfig::load(file.path()).unwrap();
        assert_eq!(config.chart_sheet, "MAPAS");
        assert_eq!(config.data_sheet, "COBERTURA");
        assert_eq!(config.margins.top, 3.0);
        assert_eq!(config.margins.left, 2.54);
        assert_eq!(config.supervisors.len(), 4);
    }

    #[test]
    fn test_results_anchor() {
        let config = ReportConfig::default();
        assert_eq!(config.results_anchor("CONECEL S.A."), "RESULTADOS CONECEL S.A.");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(ReportConfig::load(file.path()).is_err());
    }
}
