//! Parsing of template filenames and the coverage spreadsheet

pub mod coverage;
pub mod filename;

pub use coverage::{load_coverage_table, lookup_record, CoverageTable, RecordMatch};
pub use filename::{normalize_operator, parse_report_filename};
