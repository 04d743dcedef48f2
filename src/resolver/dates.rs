//! Calendar date rendering with explicit month names

use crate::models::CellValue;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Month names and the connector word of the long form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub months: [&'static str; 12],
    pub connector: &'static str,
}

impl Locale {
    pub const SPANISH: Locale = Locale {
        months: [
            "enero",
            "febrero",
            "marzo",
            "abril",
            "mayo",
            "junio",
            "julio",
            "agosto",
            "septiembre",
            "octubre",
            "noviembre",
            "diciembre",
        ],
        connector: "de",
    };

    pub fn month_name(&self, date: NaiveDate) -> &'static str {
        self.months[date.month0() as usize]
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::SPANISH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `enero`
    MonthOnly,
    /// `31/01/2025`
    DayMonthYear,
    /// `31 de enero de 2025`
    Long,
}

const TEXT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Interpret a cell as a calendar date
pub fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => CellValue::from_excel_serial(*n).map(|dt| dt.date()),
        CellValue::Integer(i) => CellValue::from_excel_serial(*i as f64).map(|dt| dt.date()),
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    TEXT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
        .or_else(|| {
            TEXT_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

pub fn format_naive_date(date: NaiveDate, style: DateStyle, locale: &Locale) -> String {
    match style {
        DateStyle::MonthOnly => locale.month_name(date).to_string(),
        DateStyle::DayMonthYear => date.format("%d/%m/%Y").to_string(),
        DateStyle::Long => format!(
            "{:02} {} {} {} {}",
            date.day(),
            locale.connector,
            locale.month_name(date),
            locale.connector,
            date.year()
        ),
    }
}

/// Render a cell as a date; values that are not dates come back as-is
pub fn format_date(value: &CellValue, style: DateStyle, locale: &Locale) -> String {
    match parse_date(value) {
        Some(date) => format_naive_date(date, style, locale),
        None => value.to_string(),
    }
}
