//! Part relationships (`_rels/*.rels`)

use super::xml::{Element, XmlDocument};
use anyhow::Result;

pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
pub const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

#[derive(Debug, Clone)]
pub struct Relationships {
    doc: XmlDocument,
}

impl Relationships {
    pub fn empty() -> Self {
        Self {
            doc: XmlDocument::new(Element::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS)),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            doc: XmlDocument::parse(bytes)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Relationship> + '_ {
        self.doc
            .root
            .elements()
            .filter(|e| e.local_name() == "Relationship")
            .filter_map(|e| {
                Some(Relationship {
                    id: e.attr("Id")?.to_string(),
                    rel_type: e.attr("Type")?.to_string(),
                    target: e.attr("Target")?.to_string(),
                    external: e.attr("TargetMode") == Some("External"),
                })
            })
    }

    pub fn get(&self, id: &str) -> Option<Relationship> {
        self.iter().find(|r| r.id == id)
    }

    pub fn first_of_type(&self, rel_type: &str) -> Option<Relationship> {
        self.iter().find(|r| r.rel_type == rel_type)
    }

    /// Add a relationship and return its fresh `rIdN`
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let next = self
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);
        self.doc.root.push(
            Element::new("Relationship")
                .with_attr("Id", id.as_str())
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }
}

/// `word/document.xml` → `word/_rels/document.xml.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns it
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Inverse of [`resolve_target`] for parts under the source's directory
pub fn relative_target(source_part: &str, part: &str) -> String {
    match source_part.rsplit_once('/') {
        Some((dir, _)) => part
            .strip_prefix(&format!("{}/", dir))
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{}", part)),
        None => part.to_string(),
    }
}
