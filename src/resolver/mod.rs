//! Placeholder resolution: record fields to display strings

pub mod dates;

pub use dates::{format_date, parse_date, DateStyle, Locale};

use crate::models::{tokens, MeasurementRecord, PlaceholderMap, ScheduleDateValues};
use crate::utils::capitalize_first;
use tracing::debug;

/// Build the token map for one record.
///
/// The schedule date is rendered three ways and also bound to the explicit
/// per-section tokens; text fields appear literal and capitalized.
pub fn build_placeholders(record: &MeasurementRecord, locale: &Locale) -> PlaceholderMap {
    let schedule = ScheduleDateValues {
        antecedentes: format_date(&record.schedule_date, DateStyle::MonthOnly, locale),
        pruebas_realizadas: format_date(&record.schedule_date, DateStyle::DayMonthYear, locale),
        conclusiones: format_date(&record.schedule_date, DateStyle::Long, locale),
    };

    let mut map = PlaceholderMap::new(schedule.clone());
    map.insert(tokens::PROVINCE, record.province.as_str());
    map.insert(tokens::PROVINCE_TITLE, capitalize_first(&record.province));
    map.insert(tokens::CANTON, record.canton.as_str());
    map.insert(tokens::CANTON_TITLE, capitalize_first(&record.canton));
    map.insert(tokens::LOCALITY, record.locality.as_str());
    map.insert(tokens::LOCALITY_TITLE, capitalize_first(&record.locality));
    map.insert(tokens::REPORT_NUMBER, record.report_number.as_str());
    map.insert(
        tokens::REPORT_DATE,
        format_date(&record.report_date, DateStyle::Long, locale),
    );
    map.insert(tokens::MEASURED_VALUE, record.measured_value.as_str());
    map.insert(tokens::OPERATOR_COVERAGE, record.operator_coverage.as_str());
    map.insert(tokens::MEETS_TARGET_ARCOTEL, record.meets_target_arcotel.as_str());
    map.insert(tokens::TOTAL_SAMPLES_ARCOTEL, record.total_samples_arcotel.as_str());
    map.insert(tokens::VALID_SAMPLES_ARCOTEL, record.valid_samples_arcotel.as_str());
    map.insert(
        tokens::VALID_SPEED_SAMPLES_ARCOTEL,
        record.valid_speed_samples_arcotel.as_str(),
    );
    map.insert(tokens::MAP_CHANGE_ARCOTEL, record.requires_map_change_arcotel.as_str());
    map.insert(
        tokens::VALID_SAMPLES_PCT_OPERATOR,
        record.valid_samples_pct_operator.as_str(),
    );
    map.insert(tokens::MEETS_TARGET_OPERATOR, record.meets_target_operator.as_str());
    map.insert(tokens::MAP_CHANGE_OPERATOR, record.requires_map_change_operator.as_str());

    map.insert(tokens::BACKGROUND_DATE, schedule.antecedentes);
    map.insert(tokens::TESTS_DATE, schedule.pruebas_realizadas);
    map.insert(tokens::CONCLUSIONS_DATE, schedule.conclusiones);

    debug!(tokens = map.len(), "resolved placeholders");
    map
}
