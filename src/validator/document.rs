//! Post-fill check for placeholders nobody resolved

use crate::ooxml::DocxDocument;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"«[^«»]+»").unwrap();
}

/// Distinct `«...»` tokens still in the document, in first-seen order
pub fn leftover_placeholders(doc: &DocxDocument) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for text in doc.paragraph_texts() {
        for token in TOKEN_PATTERN.find_iter(&text) {
            if !found.iter().any(|t| t == token.as_str()) {
                found.push(token.as_str().to_string());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::OpcPackage;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leftovers_deduplicated() {
        let mut package = OpcPackage::default();
        package.write(
            "[Content_Types].xml",
            br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#.to_vec(),
        );
        package.write(
            "word/document.xml",
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>\
             <w:p><w:r><w:t>«A» y «B»</w:t></w:r></w:p><w:p><w:r><w:t>«A» sin cerrar «</w:t></w:r></w:p>\
             </w:body></w:document>"
                .as_bytes()
                .to_vec(),
        );
        let doc = DocxDocument::from_package(package).unwrap();
        assert_eq!(leftover_placeholders(&doc), vec!["«A»", "«B»"]);
    }
}
