//! Report generation failures the user needs to tell apart

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File name does not follow LOCALITY_NG_OPERATOR_TYPE.docx: {0}")]
    InvalidFilename(String),

    #[error("Sheet '{sheet}' not found in {}", .path.display())]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No data found for locality {locality} with technology {technology} and operator {operator}")]
    RecordNotFound {
        locality: String,
        technology: String,
        operator: String,
    },

    #[error("Not enough images in sheet '{sheet}' ({found} found, {required} required)")]
    InsufficientImages {
        sheet: String,
        found: usize,
        required: usize,
    },

    #[error("Section '{0}' not found in the document")]
    AnchorNotFound(String),

    #[error("No asset matching '{pattern}' in {}", .dir.display())]
    AssetNotFound { pattern: String, dir: PathBuf },
}
