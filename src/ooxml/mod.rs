//! Office Open XML plumbing for reading and writing .docx and .xlsx packages

pub mod content_types;
pub mod document;
pub mod drawing;
pub mod package;
pub mod relationships;
pub mod wml;
pub mod xml;

pub use document::{DocxDocument, HeaderFooterKind};
pub use drawing::PictureSource;
pub use package::OpcPackage;
pub use xml::{Element, XmlDocument};
