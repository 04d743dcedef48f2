//! Core data models for report generation

pub mod error;
pub mod outcome;
pub mod placeholders;
pub mod record;
pub mod supervisor;
pub mod target;

pub use error::*;
pub use outcome::*;
pub use placeholders::*;
pub use record::*;
pub use supervisor::*;
pub use target::*;
