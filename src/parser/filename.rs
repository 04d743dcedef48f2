//! Template filename parsing

use crate::models::ReportTarget;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Operator short codes and their legal entity names
const OPERATOR_NAMES: &[(&str, &str)] = &[
    ("CONECEL", "CONECEL S.A."),
    ("OTECEL", "OTECEL S.A."),
];

lazy_static! {
    // LOCALITY_NG_OPERATOR_TYPE.docx; the locality may itself contain underscores
    static ref FILENAME_PATTERN: Regex = Regex::new(
        r"^(.+)_(\dG)_(.+)_(.+)\.docx$"
    ).unwrap();
}

/// Parse `LOCALITY_NG_OPERATOR_TYPE.docx` into a report target
pub fn parse_report_filename(filename: &str) -> Option<ReportTarget> {
    let caps = FILENAME_PATTERN.captures(filename)?;

    let target = ReportTarget {
        locality: normalize_locality(&caps[1]),
        technology: caps[2].to_string(),
        operator: normalize_operator(&caps[3]),
        measurement_type: caps[4].to_uppercase(),
    };
    debug!(%target, filename, "parsed template filename");
    Some(target)
}

pub fn normalize_locality(raw: &str) -> String {
    raw.replace('_', " ").to_uppercase()
}

pub fn normalize_operator(raw: &str) -> String {
    let upper = raw.to_uppercase();
    OPERATOR_NAMES
        .iter()
        .find(|(code, _)| *code == upper)
        .map(|(_, name)| name.to_string())
        .unwrap_or(upper)
}
