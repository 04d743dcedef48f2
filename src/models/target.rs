//! Report target derived from the template filename

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTarget {
    /// Upper-cased locality with underscores turned into spaces
    pub locality: String,
    /// Technology tag such as `4G`
    pub technology: String,
    /// Operator legal name after normalization
    pub operator: String,
    pub measurement_type: String,
}

impl fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.locality, self.technology, self.operator, self.measurement_type
        )
    }
}
