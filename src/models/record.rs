//! Measurement rows read from the coverage sheet

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Column headers of the `COBERTURA` sheet, used verbatim as lookup keys
pub mod columns {
    pub const LOCALITY: &str = "PARROQUIA";
    pub const CANTON: &str = "CANTÓN";
    pub const PROVINCE: &str = "PROVINCIA";
    pub const OPERATOR: &str = "OPERADORA";
    pub const SCHEDULE_DATE: &str = "FECHA CRONOGRAMA DE MEDICION 2024";
    pub const REPORT_NUMBER: &str = "NÚMERO  DE INFORME";
    pub const REPORT_DATE: &str = "FECHA DE INFORME";
    pub const TOTAL_SAMPLES_ARCOTEL: &str = "NUMERO TOTAL DE MUESTRAS ARCOTEL";
    pub const VALID_SAMPLES_ARCOTEL: &str = "NUMERO VALIDAS ARCOTEL";
    pub const VALID_SPEED_SAMPLES_ARCOTEL: &str = "MUESTRAS VALIDAS VELOCIDAD ARCOTEL";
    pub const MAP_CHANGE_ARCOTEL: &str = "REQUIERE MODIFICAR MAPA DE COBERTURA ARCOTEL";
    pub const MEASURED_VALUE: &str = "VALOR MEDIDO";
    pub const OPERATOR_COVERAGE: &str = "COBERTURA OPERADORA";
    pub const MEETS_TARGET_ARCOTEL: &str = "ALCANZA VALOR OBJETIVO ARCOTEL";
    pub const VALID_SAMPLES_PCT_OPERATOR: &str = "PORCENTAJE DE MUESTRAS VALIDAS OPERADORA";
    pub const MEETS_TARGET_OPERATOR: &str = "ALCANZA VALOR OBJETIVO OPERADORA";
    pub const MAP_CHANGE_OPERATOR: &str = "REQUIERE MODIFICAR MAPA DE COBERTURA OPERADORA";

    pub const REQUIRED: &[&str] = &[
        LOCALITY,
        CANTON,
        PROVINCE,
        OPERATOR,
        SCHEDULE_DATE,
        REPORT_NUMBER,
        REPORT_DATE,
        TOTAL_SAMPLES_ARCOTEL,
        VALID_SAMPLES_ARCOTEL,
        VALID_SPEED_SAMPLES_ARCOTEL,
        MAP_CHANGE_ARCOTEL,
        MEASURED_VALUE,
        OPERATOR_COVERAGE,
        MEETS_TARGET_ARCOTEL,
        VALID_SAMPLES_PCT_OPERATOR,
        MEETS_TARGET_OPERATOR,
        MAP_CHANGE_OPERATOR,
    ];
}

/// A single spreadsheet cell
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Date-time from an Excel serial number (1900 date system)
    pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let seconds = (serial * 86_400.0).round() as i64;
        epoch.checked_add_signed(Duration::seconds(seconds))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// One row of the coverage sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    pub locality: String,
    pub canton: String,
    pub province: String,
    pub operator: String,
    pub schedule_date: CellValue,
    pub report_number: String,
    pub report_date: CellValue,
    pub total_samples_arcotel: String,
    pub valid_samples_arcotel: String,
    pub valid_speed_samples_arcotel: String,
    pub requires_map_change_arcotel: String,
    pub measured_value: String,
    pub operator_coverage: String,
    pub meets_target_arcotel: String,
    pub valid_samples_pct_operator: String,
    pub meets_target_operator: String,
    pub requires_map_change_operator: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CellValue::Integer(120), "120")]
    #[test_case(CellValue::Number(95.0), "95")]
    #[test_case(CellValue::Number(95.25), "95.25")]
    #[test_case(CellValue::Bool(true), "True")]
    #[test_case(CellValue::Empty, "")]
    #[test_case(CellValue::Text("SI".to_string()), "SI")]
    fn test_cell_display(value: CellValue, expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn test_excel_serial_conversion() {
        let dt = CellValue::from_excel_serial(45688.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert!(CellValue::from_excel_serial(-1.0).is_none());
    }

    #[test]
    fn test_required_columns_are_unique() {
        let mut seen = std::collections::HashSet::new();
        assert!(columns::REQUIRED.iter().all(|c| seen.insert(*c)));
    }
}
