//! `[Content_Types].xml`

use super::xml::{Element, XmlDocument};
use anyhow::Result;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

pub const CT_HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const CT_FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

#[derive(Debug, Clone)]
pub struct ContentTypes {
    doc: XmlDocument,
}

impl ContentTypes {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            doc: XmlDocument::parse(bytes)?,
        })
    }

    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        let extension = extension.to_lowercase();
        let exists = self.doc.root.elements().any(|e| {
            e.local_name() == "Default"
                && e.attr("Extension").map(str::to_lowercase).as_deref() == Some(extension.as_str())
        });
        if !exists {
            self.doc.root.push(
                Element::new("Default")
                    .with_attr("Extension", extension)
                    .with_attr("ContentType", content_type),
            );
        }
    }

    pub fn add_override(&mut self, part: &str, content_type: &str) {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        self.doc.root.push(
            Element::new("Override")
                .with_attr("PartName", part_name)
                .with_attr("ContentType", content_type),
        );
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }
}

pub fn image_content_type(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "image/png",
    }
}
