//! Required column check for the coverage sheet

use crate::models::{columns, ReportError};
use crate::parser::CoverageTable;
use anyhow::Result;

/// Every required header must be present, matched verbatim
pub fn validate_columns(table: &CoverageTable) -> Result<()> {
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::MissingColumns(missing).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_columns_present() {
        let headers = columns::REQUIRED.iter().map(|c| c.to_string()).collect();
        assert!(validate_columns(&CoverageTable::new(headers, Vec::new())).is_ok());
    }

    #[test]
    fn test_missing_columns_listed() {
        let headers = columns::REQUIRED
            .iter()
            .filter(|c| **c != columns::CANTON && **c != columns::REPORT_NUMBER)
            .map(|c| c.to_string())
            .collect();
        let err = validate_columns(&CoverageTable::new(headers, Vec::new())).unwrap_err();
        match err.downcast_ref::<ReportError>() {
            Some(ReportError::MissingColumns(missing)) => {
                assert_eq!(missing, &vec![columns::CANTON.to_string(), columns::REPORT_NUMBER.to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_single_space_report_number_is_not_accepted() {
        let headers = columns::REQUIRED
            .iter()
            .map(|c| c.replace("NÚMERO  DE", "NÚMERO DE"))
            .collect();
        assert!(validate_columns(&CoverageTable::new(headers, Vec::new())).is_err());
    }
}
