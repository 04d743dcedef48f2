//! Document transformation: placeholder filling and asset assembly

pub mod assembler;
pub mod filler;
pub mod recommendations;

pub use assembler::{adjust_margins, insert_chart, insert_correction_image, replace_banner_images};
pub use filler::{fill_document, ScheduleDates};
pub use recommendations::replace_recommendations;
