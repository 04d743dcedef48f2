//! Minimal mutable XML element tree over quick-xml
//!
//! OOXML parts are small enough to hold in memory. The tree keeps every
//! element, attribute, text node and comment in source order so that a part
//! which is parsed and written back without edits keeps its content.

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Name without namespace prefix (`w:p` → `p`)
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements_mut().filter(move |e| e.name == name)
    }

    /// Position in `children` of the n-th element child
    pub fn element_position(&self, element_index: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, Node::Element(_)))
            .nth(element_index)
            .map(|(pos, _)| pos)
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Insert an element directly after the n-th element child
    pub fn insert_after_element(&mut self, element_index: usize, child: Element) {
        let position = self
            .element_position(element_index)
            .map(|p| p + 1)
            .unwrap_or(self.children.len());
        self.children.insert(position, Node::Element(child));
    }

    /// True when any descendant (or self) has the given name
    pub fn contains_element(&self, name: &str) -> bool {
        self.name == name || self.elements().any(|e| e.contains_element(name))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// Pre-order visit of self and every descendant element
    pub fn walk(&self, f: &mut dyn FnMut(&Element)) {
        f(self);
        for child in self.elements() {
            child.walk(f);
        }
    }

    /// Parse a standalone fragment such as a single `<w:r>`
    pub fn parse_fragment(xml: &str) -> Result<Element> {
        Ok(XmlDocument::parse(xml.as_bytes())?.root)
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(e) => e.write_to(out),
                Node::Text(t) => out.push_str(&escape(t.as_str())),
                Node::CData(t) => {
                    out.push_str("<![CDATA[");
                    out.push_str(t);
                    out.push_str("]]>");
                }
                Node::Comment(t) => {
                    out.push_str("<!--");
                    out.push_str(t);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A parsed XML part
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: Element,
    has_declaration: bool,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            has_declaration: true,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).context("XML part is not valid UTF-8")?;
        let text = text.trim_start_matches('\u{feff}');
        let mut reader = Reader::from_str(text);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;
        let mut has_declaration = false;

        loop {
            match reader.read_event().context("Malformed XML")? {
                Event::Decl(_) => has_declaration = true,
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| anyhow::anyhow!("Unbalanced closing tag"))?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = text.unescape().context("Invalid XML text escape")?;
                        parent.children.push(Node::Text(value.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = String::from_utf8_lossy(&data).into_owned();
                        parent.children.push(Node::CData(value));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = String::from_utf8_lossy(&comment).into_owned();
                        parent.children.push(Node::Comment(value));
                    }
                }
                Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            anyhow::bail!("Unclosed element <{}>", stack[stack.len() - 1].name);
        }
        let root = root.ok_or_else(|| anyhow::anyhow!("XML part has no root element"))?;

        Ok(Self {
            root,
            has_declaration,
        })
    }

    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if self.has_declaration {
            out.push_str(XML_DECLARATION);
        }
        self.root.write_to(&mut out);
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml_string().into_bytes()
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.context("Malformed XML attribute")?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        // Equivalent of `Attribute::unescape_value`, which quick-xml hides when
        // its `encoding` feature is enabled (calamine enables it).
        let raw = std::str::from_utf8(&attr.value).context("Invalid XML attribute escape")?;
        let value = quick_xml::escape::unescape(raw)
            .context("Invalid XML attribute escape")?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_text_and_attributes() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t xml:space="preserve"> a &amp; b </w:t></w:r></w:p></w:body></w:document>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let again = XmlDocument::parse(&doc.to_bytes()).unwrap();
        assert_eq!(doc, again);
        assert_eq!(doc.root.text(), " a & b ");
    }

    #[test]
    fn test_empty_elements_and_lookup() {
        let root = Element::parse_fragment(r#"<a><b x="1"/><c/><b x="2"/></a>"#).unwrap();
        let values: Vec<_> = root.children_named("b").filter_map(|b| b.attr("x")).collect();
        assert_eq!(values, vec!["1", "2"]);
        assert!(root.contains_element("c"));
        assert_eq!(root.local_name(), "a");
    }

    #[test]
    fn test_insert_after_element() {
        let mut root = Element::parse_fragment("<a><b/><c/></a>").unwrap();
        root.insert_after_element(0, Element::new("x"));
        let names: Vec<_> = root.elements().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["b", "x", "c"]);
    }

    #[test]
    fn test_unbalanced_is_error() {
        assert!(XmlDocument::parse(b"<a><b></a>").is_err());
    }
}
