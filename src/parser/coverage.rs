//! Coverage sheet loading and record lookup

use crate::models::{columns, CellValue, MeasurementRecord, ReportError, ReportTarget};
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, info};

/// Header row plus data rows of one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Row selected for a target, with how many rows matched
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMatch {
    pub record: MeasurementRecord,
    pub match_count: usize,
}

impl CoverageTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell by row index and column header
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }

    fn text(&self, row: usize, column: &str) -> String {
        self.cell(row, column)
            .map(|c| c.to_string())
            .unwrap_or_default()
    }

    fn value(&self, row: usize, column: &str) -> CellValue {
        self.cell(row, column).cloned().unwrap_or_default()
    }

    /// Build the record for one data row
    pub fn record(&self, row: usize) -> MeasurementRecord {
        MeasurementRecord {
            locality: self.text(row, columns::LOCALITY),
            canton: self.text(row, columns::CANTON),
            province: self.text(row, columns::PROVINCE),
            operator: self.text(row, columns::OPERATOR),
            schedule_date: self.value(row, columns::SCHEDULE_DATE),
            report_number: self.text(row, columns::REPORT_NUMBER),
            report_date: self.value(row, columns::REPORT_DATE),
            total_samples_arcotel: self.text(row, columns::TOTAL_SAMPLES_ARCOTEL),
            valid_samples_arcotel: self.text(row, columns::VALID_SAMPLES_ARCOTEL),
            valid_speed_samples_arcotel: self.text(row, columns::VALID_SPEED_SAMPLES_ARCOTEL),
            requires_map_change_arcotel: self.text(row, columns::MAP_CHANGE_ARCOTEL),
            measured_value: self.text(row, columns::MEASURED_VALUE),
            operator_coverage: self.text(row, columns::OPERATOR_COVERAGE),
            meets_target_arcotel: self.text(row, columns::MEETS_TARGET_ARCOTEL),
            valid_samples_pct_operator: self.text(row, columns::VALID_SAMPLES_PCT_OPERATOR),
            meets_target_operator: self.text(row, columns::MEETS_TARGET_OPERATOR),
            requires_map_change_operator: self.text(row, columns::MAP_CHANGE_OPERATOR),
        }
    }
}

/// Load a sheet by name; the first row holds the column headers
pub fn load_coverage_table(path: &Path, sheet: &str) -> Result<CoverageTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(ReportError::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        }
        .into());
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Failed to read sheet '{}'", sheet))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| convert_cell(c).to_string()).collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    info!(sheet, columns = headers.len(), rows = rows.len(), "loaded coverage table");
    Ok(CoverageTable::new(headers, rows))
}

pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match CellValue::from_excel_serial(dt.as_f64()) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Select the row whose locality and operator match the target.
///
/// Locality is compared trimmed and upper-cased, operator trimmed. When
/// several rows match the first one wins and `match_count` says how many did.
pub fn lookup_record(table: &CoverageTable, target: &ReportTarget) -> Result<RecordMatch> {
    let (Some(loc_col), Some(op_col)) = (
        table.column_index(columns::LOCALITY),
        table.column_index(columns::OPERATOR),
    ) else {
        let missing = [columns::LOCALITY, columns::OPERATOR]
            .iter()
            .filter(|c| table.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect();
        return Err(ReportError::MissingColumns(missing).into());
    };

    let matches: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let locality = row.get(loc_col).map(|c| c.to_string()).unwrap_or_default();
            let operator = row.get(op_col).map(|c| c.to_string()).unwrap_or_default();
            locality.trim().to_uppercase() == target.locality && operator.trim() == target.operator
        })
        .map(|(i, _)| i)
        .collect();

    debug!(%target, matches = matches.len(), "record lookup");

    match matches.first() {
        Some(&row) => Ok(RecordMatch {
            record: table.record(row),
            match_count: matches.len(),
        }),
        None => Err(ReportError::RecordNotFound {
            locality: target.locality.clone(),
            technology: target.technology.clone(),
            operator: target.operator.clone(),
        }
        .into()),
    }
}
