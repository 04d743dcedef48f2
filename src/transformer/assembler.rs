//! Image insertion, header/footer banners and page margins

use crate::config::{CorrectionConfig, MarginsCm};
use crate::models::ReportError;
use crate::ooxml::drawing::cm_to_twips;
use crate::ooxml::wml::{self, DRAWING, P, PG_MAR};
use crate::ooxml::xml::Node;
use crate::ooxml::{DocxDocument, Element, HeaderFooterKind, PictureSource};
use anyhow::{anyhow, Result};
use tracing::debug;

/// Element index of the first top-level body paragraph containing `anchor`
fn find_anchor(doc: &DocxDocument, anchor: &str) -> Result<usize> {
    let body = doc.body().ok_or_else(|| anyhow!("Document has no body"))?;
    body.elements()
        .position(|e| e.name == P && wml::paragraph_text(e).contains(anchor))
        .ok_or_else(|| ReportError::AnchorNotFound(anchor.to_string()).into())
}

/// Append the chart as a new run at the end of the anchor paragraph
pub fn insert_chart(
    doc: &mut DocxDocument,
    picture: &PictureSource,
    anchor: &str,
    width_inches: f64,
) -> Result<()> {
    let index = find_anchor(doc, anchor)?;
    let main_part = doc.main_part().to_string();
    let run = doc.picture_run(&main_part, picture, width_inches)?;

    let paragraph = doc
        .body_mut()
        .and_then(|body| body.elements_mut().nth(index))
        .ok_or_else(|| anyhow!("Anchor paragraph vanished"))?;
    paragraph.push(run);
    debug!(anchor, "chart inserted");
    Ok(())
}

/// Swap the banner image of every default header or footer part.
///
/// Drawing runs of the part's paragraphs are emptied and the new picture is
/// appended to the first paragraph. Returns the number of parts touched.
pub fn replace_banner_images(
    doc: &mut DocxDocument,
    kind: HeaderFooterKind,
    picture: &PictureSource,
    width_inches: f64,
) -> Result<usize> {
    let parts = doc.ensure_default_parts(kind)?;
    for part in &parts {
        let run = doc.picture_run(part, picture, width_inches)?;
        let root = doc
            .part_root_mut(part)
            .ok_or_else(|| anyhow!("Missing part {}", part))?;

        let cleared = clear_drawing_runs(root);
        if root.child(P).is_none() {
            root.push(Element::new(P));
        }
        if let Some(first) = root.child_mut(P) {
            first.push(run);
        }
        debug!(part = %part, cleared, "banner replaced");
    }
    Ok(parts.len())
}

/// Empty every run holding a drawing in the part's top-level paragraphs
fn clear_drawing_runs(root: &mut Element) -> usize {
    let mut cleared = 0;
    for paragraph in root.children_named_mut(P) {
        for run in wml::runs_mut(paragraph) {
            if run.contains_element(DRAWING) {
                run.children.clear();
                run.attributes.clear();
                cleared += 1;
            }
        }
    }
    cleared
}

/// Set page margins on every section. Returns the number of sections.
pub fn adjust_margins(doc: &mut DocxDocument, margins: &MarginsCm) -> usize {
    let values = [
        ("w:top", cm_to_twips(margins.top)),
        ("w:bottom", cm_to_twips(margins.bottom)),
        ("w:left", cm_to_twips(margins.left)),
        ("w:right", cm_to_twips(margins.right)),
    ];
    let mut sections = 0;
    doc.for_each_section_mut(&mut |sect| {
        if sect.child(PG_MAR).is_none() {
            let margin = Element::new(PG_MAR)
                .with_attr("w:header", "708")
                .with_attr("w:footer", "708")
                .with_attr("w:gutter", "0");
            let after = sect
                .elements()
                .enumerate()
                .filter(|(_, e)| {
                    matches!(
                        e.name.as_str(),
                        "w:headerReference"
                            | "w:footerReference"
                            | "w:footnotePr"
                            | "w:endnotePr"
                            | "w:type"
                            | "w:pgSz"
                    )
                })
                .map(|(i, _)| i)
                .last();
            match after {
                Some(i) => sect.insert_after_element(i, margin),
                None => sect.children.insert(0, Node::Element(margin)),
            }
        }
        if let Some(margin) = sect.child_mut(PG_MAR) {
            for (key, twips) in values {
                margin.set_attr(key, twips.to_string());
            }
        }
        sections += 1;
    });
    debug!(sections, "margins adjusted");
    sections
}

/// Append the correction map to the anchor paragraph and add its caption after it
pub fn insert_correction_image(
    doc: &mut DocxDocument,
    picture: &PictureSource,
    settings: &CorrectionConfig,
) -> Result<()> {
    let index = find_anchor(doc, &settings.anchor)?;
    let main_part = doc.main_part().to_string();
    let run = doc.picture_run(&main_part, picture, settings.width_inches)?;

    let mut caption = wml::centered_paragraph();
    caption.push(wml::text_run(&settings.caption_label, Some(wml::bold_properties())));
    caption.push(wml::text_run(&settings.caption_text, None));

    let body = doc
        .body_mut()
        .ok_or_else(|| anyhow!("Document has no body"))?;
    body.elements_mut()
        .nth(index)
        .ok_or_else(|| anyhow!("Anchor paragraph vanished"))?
        .push(run);
    body.insert_after_element(index, caption);
    debug!(anchor = %settings.anchor, "correction image inserted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::OpcPackage;
    use pretty_assertions::assert_eq;

    fn document(body: &str) -> DocxDocument {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut package = OpcPackage::default();
        package.write(
            "[Content_Types].xml",
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"></Types>"#.to_vec(),
        );
        package.write("word/document.xml", xml.into_bytes());
        DocxDocument::from_package(package).unwrap()
    }

    fn picture() -> PictureSource {
        PictureSource {
            file_name: "chart.png".to_string(),
            extension: "png".to_string(),
            data: vec![0x89, b'P', b'N', b'G'],
            width_px: 200,
            height_px: 100,
        }
    }

    #[test]
    fn test_chart_goes_into_anchor_paragraph() {
        let mut doc = document(
            "<w:p><w:r><w:t>4. RESULTADOS CONECEL S.A.</w:t></w:r></w:p><w:p><w:r><w:t>otro</w:t></w:r></w:p>",
        );
        insert_chart(&mut doc, &picture(), "RESULTADOS CONECEL S.A.", 6.0).unwrap();

        let body = doc.body().unwrap();
        let anchor = body.children_named(P).next().unwrap();
        assert_eq!(wml::runs(anchor).count(), 2);
        assert!(anchor.contains_element(DRAWING));
        assert!(!body.children_named(P).nth(1).unwrap().contains_element(DRAWING));
    }

    #[test]
    fn test_missing_anchor_is_reported() {
        let mut doc = document("<w:p><w:r><w:t>RESULTADOS OTECEL S.A.</w:t></w:r></w:p>");
        let err = insert_chart(&mut doc, &picture(), "RESULTADOS CONECEL S.A.", 6.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::AnchorNotFound(_))
        ));
        assert!(!doc.body().unwrap().contains_element(DRAWING));
    }

    #[test]
    fn test_margins_written_in_twips() {
        let mut doc = document(
            r#"<w:p/><w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:cols w:space="708"/></w:sectPr>"#,
        );
        assert_eq!(adjust_margins(&mut doc, &MarginsCm::default()), 1);

        let sect = doc.sections()[0];
        let names: Vec<_> = sect.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:pgSz", "w:pgMar", "w:cols"]);
        let margin = sect.child(PG_MAR).unwrap();
        assert_eq!(margin.attr("w:top"), Some("2268"));
        assert_eq!(margin.attr("w:bottom"), Some("1440"));
        assert_eq!(margin.attr("w:left"), Some("1440"));
        assert_eq!(margin.attr("w:right"), Some("1440"));
    }

    #[test]
    fn test_correction_image_followed_by_caption() {
        let mut doc = document(
            "<w:p><w:r><w:t>MAPA DE COBERTURA CORREGIDO</w:t></w:r></w:p><w:p><w:r><w:t>fin</w:t></w:r></w:p>",
        );
        insert_correction_image(&mut doc, &picture(), &CorrectionConfig::default()).unwrap();

        let body = doc.body().unwrap();
        let paragraphs: Vec<&Element> = body.children_named(P).collect();
        let texts: Vec<_> = paragraphs.iter().map(|p| wml::paragraph_text(p)).collect();
        assert_eq!(
            texts,
            vec![
                "MAPA DE COBERTURA CORREGIDO",
                "Figura: Mapa de cobertura corregido con las mediciones de campo.",
                "fin",
            ]
        );

        let anchor_runs: Vec<&Element> = paragraphs[0].children_named(wml::R).collect();
        assert_eq!(anchor_runs.len(), 2);
        assert!(anchor_runs[1].contains_element(DRAWING));

        let caption = paragraphs[1];
        let jc = caption.child(wml::PPR).and_then(|ppr| ppr.child("w:jc")).unwrap();
        assert_eq!(jc.attr("w:val"), Some("center"));
        let caption_runs: Vec<&Element> = caption.children_named(wml::R).collect();
        assert_eq!(wml::run_text(caption_runs[0]), "Figura:");
        assert!(caption_runs[0].child(wml::RPR).unwrap().contains_element("w:b"));
        assert!(!caption_runs[1].contains_element("w:b"));
        assert!(!caption.contains_element(DRAWING));
    }

    #[test]
    fn test_banner_creates_missing_header() {
        let mut doc = document("<w:p/><w:sectPr/>");
        let touched = replace_banner_images(&mut doc, HeaderFooterKind::Header, &picture(), 6.0).unwrap();
        assert_eq!(touched, 1);

        let parts = doc.header_footer_parts(HeaderFooterKind::Header);
        assert_eq!(parts.len(), 1);
        let root = doc.part_root(&parts[0]).unwrap();
        assert!(root.child(P).unwrap().contains_element(DRAWING));
    }

    #[test]
    fn test_clear_drawing_runs_keeps_text_runs() {
        let mut root = Element::parse_fragment(
            "<w:hdr><w:p><w:r><w:drawing/></w:r><w:r><w:t>texto</w:t></w:r></w:p></w:hdr>",
        )
        .unwrap();
        assert_eq!(clear_drawing_runs(&mut root), 1);
        assert_eq!(wml::paragraph_text(root.child(P).unwrap()), "texto");
        assert!(!root.contains_element(DRAWING));
    }
}
