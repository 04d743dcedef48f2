//! Asset location: chart workbooks, banner images, correction maps

pub mod chart;
pub mod images;
pub mod workspace;

pub use chart::{find_chart_workbook, locate_chart, sheet_images, ChartImage};
pub use images::{find_banner_images, find_correction_image, BannerImages};
pub use workspace::RunWorkspace;
