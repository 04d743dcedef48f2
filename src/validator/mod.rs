//! Validation module

pub mod columns;
pub mod document;

pub use columns::validate_columns;
pub use document::leftover_placeholders;
