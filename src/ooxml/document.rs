//! A loaded .docx: main document, header/footer parts, relationships

use super::content_types::{image_content_type, ContentTypes, CONTENT_TYPES_PART, CT_FOOTER, CT_HEADER};
use super::drawing::{max_shape_id, picture_run, PictureSource};
use super::package::OpcPackage;
use super::relationships::{
    relative_target, rels_path_for, resolve_target, Relationships, REL_FOOTER, REL_HEADER,
    REL_IMAGE, REL_OFFICE_DOCUMENT,
};
use super::wml::{self, P, R_NS, SECT_PR, W_NS};
use super::xml::{Element, Node, XmlDocument};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const DEFAULT_MAIN_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl HeaderFooterKind {
    fn reference_name(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:headerReference",
            HeaderFooterKind::Footer => "w:footerReference",
        }
    }

    fn root_name(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:hdr",
            HeaderFooterKind::Footer => "w:ftr",
        }
    }

    fn rel_type(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => REL_HEADER,
            HeaderFooterKind::Footer => REL_FOOTER,
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => CT_HEADER,
            HeaderFooterKind::Footer => CT_FOOTER,
        }
    }

    fn part_stem(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }
}

pub struct DocxDocument {
    package: OpcPackage,
    main_part: String,
    main: XmlDocument,
    content_types: ContentTypes,
    parts: BTreeMap<String, XmlDocument>,
    rels: BTreeMap<String, Relationships>,
    next_shape_id: u32,
}

impl DocxDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let package = OpcPackage::open(path)?;
        Self::from_package(package)
            .with_context(|| format!("Failed to load document {}", path.display()))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_package(OpcPackage::from_bytes(bytes)?)
    }

    pub fn from_package(package: OpcPackage) -> Result<Self> {
        let main_part = match package.read("_rels/.rels") {
            Some(bytes) => Relationships::parse(bytes)?
                .first_of_type(REL_OFFICE_DOCUMENT)
                .map(|r| resolve_target("", &r.target))
                .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()),
            None => DEFAULT_MAIN_PART.to_string(),
        };

        let main = XmlDocument::parse(package.require(&main_part)?)
            .with_context(|| format!("Failed to parse {}", main_part))?;
        let content_types = ContentTypes::parse(package.require(CONTENT_TYPES_PART)?)?;

        let mut rels = BTreeMap::new();
        let main_rels = match package.read(&rels_path_for(&main_part)) {
            Some(bytes) => Relationships::parse(bytes)?,
            None => Relationships::empty(),
        };

        let mut parts = BTreeMap::new();
        for rel in main_rels.iter() {
            if rel.external || (rel.rel_type != REL_HEADER && rel.rel_type != REL_FOOTER) {
                continue;
            }
            let part = resolve_target(&main_part, &rel.target);
            let doc = XmlDocument::parse(package.require(&part)?)
                .with_context(|| format!("Failed to parse {}", part))?;
            if let Some(bytes) = package.read(&rels_path_for(&part)) {
                rels.insert(part.clone(), Relationships::parse(bytes)?);
            }
            parts.insert(part, doc);
        }
        rels.insert(main_part.clone(), main_rels);

        let next_shape_id = parts
            .values()
            .map(|d| max_shape_id(&d.root))
            .chain(std::iter::once(max_shape_id(&main.root)))
            .max()
            .unwrap_or(0)
            + 1;

        debug!(main = %main_part, parts = parts.len(), "document loaded");

        Ok(Self {
            package,
            main_part,
            main,
            content_types,
            parts,
            rels,
            next_shape_id,
        })
    }

    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    pub fn body(&self) -> Option<&Element> {
        self.main.root.child("w:body")
    }

    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.main.root.child_mut("w:body")
    }

    /// Root element of a header or footer part
    pub fn part_root(&self, part: &str) -> Option<&Element> {
        self.parts.get(part).map(|d| &d.root)
    }

    pub fn part_root_mut(&mut self, part: &str) -> Option<&mut Element> {
        self.parts.get_mut(part).map(|d| &mut d.root)
    }

    /// Every header or footer part referenced by any section, once, in section order
    pub fn header_footer_parts(&self, kind: HeaderFooterKind) -> Vec<String> {
        let mut found = Vec::new();
        for sect in self.sections() {
            for reference in sect.children_named(kind.reference_name()) {
                if let Some(part) = self.part_for_reference(reference) {
                    if !found.contains(&part) {
                        found.push(part);
                    }
                }
            }
        }
        found
    }

    /// Default header/footer part of every section, creating one for the
    /// first section when the document has none. Later sections without a
    /// default reference inherit the previous one.
    pub fn ensure_default_parts(&mut self, kind: HeaderFooterKind) -> Result<Vec<String>> {
        let defaults: Vec<Option<String>> = self
            .sections()
            .iter()
            .map(|sect| {
                sect.children_named(kind.reference_name())
                    .find(|r| r.attr("w:type").unwrap_or("default") == "default")
                    .and_then(|r| self.part_for_reference(r))
            })
            .collect();

        let mut found = Vec::new();
        if defaults.first().map(Option::is_none).unwrap_or(true) {
            found.push(self.create_default_part(kind)?);
        }
        for part in defaults.into_iter().flatten() {
            if !found.contains(&part) {
                found.push(part);
            }
        }
        Ok(found)
    }

    fn create_default_part(&mut self, kind: HeaderFooterKind) -> Result<String> {
        let mut index = 1;
        let part = loop {
            let candidate = format!("word/{}{}.xml", kind.part_stem(), index);
            if !self.package.contains(&candidate) && !self.parts.contains_key(&candidate) {
                break candidate;
            }
            index += 1;
        };

        let root = Element::new(kind.root_name())
            .with_attr("xmlns:w", W_NS)
            .with_attr("xmlns:r", R_NS)
            .with_child(Element::new(P));
        self.parts.insert(part.clone(), XmlDocument::new(root));
        self.content_types.add_override(&part, kind.content_type());

        let main_part = self.main_part.clone();
        let target = relative_target(&main_part, &part);
        let rel_id = self.rels_for(&main_part).add(kind.rel_type(), &target);

        let reference = Element::new(kind.reference_name())
            .with_attr("w:type", "default")
            .with_attr("r:id", rel_id);
        self.first_section_mut()?
            .children
            .insert(0, Node::Element(reference));

        debug!(part = %part, "created default {}", kind.part_stem());
        Ok(part)
    }

    fn first_section_mut(&mut self) -> Result<&mut Element> {
        let body = self
            .main
            .root
            .child_mut("w:body")
            .ok_or_else(|| anyhow::anyhow!("Document has no body"))?;

        let inline = body.elements().position(|e| e.name == P && wml::inline_section(e).is_some());
        match inline {
            Some(index) => body
                .elements_mut()
                .nth(index)
                .and_then(|p| p.child_mut(wml::PPR))
                .and_then(|ppr| ppr.child_mut(SECT_PR))
                .ok_or_else(|| anyhow::anyhow!("Section properties vanished")),
            None => {
                if body.child(SECT_PR).is_none() {
                    body.push(Element::new(SECT_PR));
                }
                body.child_mut(SECT_PR)
                    .ok_or_else(|| anyhow::anyhow!("Document has no section properties"))
            }
        }
    }

    fn part_for_reference(&self, reference: &Element) -> Option<String> {
        let id = reference.attr("r:id")?;
        let rel = self.rels.get(&self.main_part)?.get(id)?;
        let part = resolve_target(&self.main_part, &rel.target);
        self.parts.contains_key(&part).then_some(part)
    }

    /// Section properties in document order (paragraph-level first, body last)
    pub fn sections(&self) -> Vec<&Element> {
        let mut sections = Vec::new();
        if let Some(body) = self.body() {
            for element in body.elements() {
                if element.name == P {
                    if let Some(sect) = wml::inline_section(element) {
                        sections.push(sect);
                    }
                } else if element.name == SECT_PR {
                    sections.push(element);
                }
            }
        }
        sections
    }

    pub fn for_each_section_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        if let Some(body) = self.body_mut() {
            for element in body.elements_mut() {
                if element.name == P {
                    if let Some(sect) = element
                        .child_mut(wml::PPR)
                        .and_then(|p| p.child_mut(SECT_PR))
                    {
                        f(sect);
                    }
                } else if element.name == SECT_PR {
                    f(element);
                }
            }
        }
    }

    fn rels_for(&mut self, part: &str) -> &mut Relationships {
        self.rels
            .entry(part.to_string())
            .or_insert_with(Relationships::empty)
    }

    /// Store the picture as media, relate it to `part`, and build its run
    pub fn picture_run(&mut self, part: &str, picture: &PictureSource, width_inches: f64) -> Result<Element> {
        let extension = picture.extension.to_lowercase();
        let mut index = 1;
        let media = loop {
            let candidate = format!("word/media/image{}.{}", index, extension);
            if !self.package.contains(&candidate) {
                break candidate;
            }
            index += 1;
        };
        self.package.write(&media, picture.data.clone());
        self.content_types
            .ensure_default(&extension, image_content_type(&extension));

        let target = relative_target(part, &media);
        let rel_id = self.rels_for(part).add(REL_IMAGE, &target);

        let shape_id = self.next_shape_id;
        self.next_shape_id += 1;

        let (cx, cy) = picture.extent_for_width(width_inches);
        debug!(part, media = %media, rel = %rel_id, "embedded picture");
        picture_run(&rel_id, shape_id, &picture.file_name, cx, cy)
    }

    /// Text of every paragraph in the body, headers and footers
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        let mut collect = |e: &Element| {
            if e.name == P {
                texts.push(wml::paragraph_text(e));
            }
        };
        self.main.root.walk(&mut collect);
        for doc in self.parts.values() {
            doc.root.walk(&mut collect);
        }
        texts
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush();
        self.package.to_bytes()
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.flush();
        self.package.save(path)
    }

    fn flush(&mut self) {
        self.package.write(&self.main_part, self.main.to_bytes());
        for (part, doc) in &self.parts {
            self.package.write(part, doc.to_bytes());
        }
        for (part, rels) in &self.rels {
            self.package.write(&rels_path_for(part), rels.to_bytes());
        }
        self.package
            .write(CONTENT_TYPES_PART, self.content_types.to_bytes());
    }
}
