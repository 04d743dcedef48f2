//! WordprocessingML helpers: paragraphs, runs, tables, section properties
//!
//! Element names are matched with the conventional `w:` prefix that Word and
//! every common generator emit for the main namespace.

use super::xml::{Element, Node};

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub const P: &str = "w:p";
pub const R: &str = "w:r";
pub const T: &str = "w:t";
pub const TBL: &str = "w:tbl";
pub const TR: &str = "w:tr";
pub const TC: &str = "w:tc";
pub const PPR: &str = "w:pPr";
pub const RPR: &str = "w:rPr";
pub const BR: &str = "w:br";
pub const CR: &str = "w:cr";
pub const TAB: &str = "w:tab";
pub const DRAWING: &str = "w:drawing";
pub const SECT_PR: &str = "w:sectPr";
pub const PG_MAR: &str = "w:pgMar";

/// Direct runs of a paragraph
pub fn runs(paragraph: &Element) -> impl Iterator<Item = &Element> {
    paragraph.children_named(R)
}

pub fn runs_mut(paragraph: &mut Element) -> impl Iterator<Item = &mut Element> {
    paragraph.children_named_mut(R)
}

/// Plain line break (`w:cr`, or a `w:br` without a page or column type)
fn is_line_break(e: &Element) -> bool {
    e.name == CR || (e.name == BR && matches!(e.attr("w:type"), None | Some("textWrapping")))
}

/// `w:t`, `w:tab` and line breaks make up the text of a run
fn is_text_content(e: &Element) -> bool {
    e.name == T || e.name == TAB || is_line_break(e)
}

/// Text of a run in order, with `\t` for tabs and `\n` for line breaks
pub fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for e in run.elements() {
        if e.name == T {
            text.push_str(&e.text());
        } else if e.name == TAB {
            text.push('\t');
        } else if is_line_break(e) {
            text.push('\n');
        }
    }
    text
}

/// Content nodes spelling `text`: `w:t` pieces split at `\t` (`w:tab`) and `\n` (`w:br`)
fn text_content(text: &str) -> Vec<Element> {
    let mut nodes = Vec::new();
    let mut pending = String::new();
    for c in text.chars() {
        match c {
            '\t' | '\n' => {
                if !pending.is_empty() {
                    nodes.push(text_element(&pending));
                    pending.clear();
                }
                nodes.push(Element::new(if c == '\t' { TAB } else { BR }));
            }
            '\r' => {}
            c => pending.push(c),
        }
    }
    if !pending.is_empty() {
        nodes.push(text_element(&pending));
    }
    nodes
}

/// Rebuild the run's text content from `text`.
///
/// The new `w:t`/`w:tab`/`w:br` sequence takes the place of the old one;
/// `w:rPr` and any other child (drawings, fields) stay where they were.
pub fn set_run_text(run: &mut Element, text: &str) {
    let position = run
        .children
        .iter()
        .position(|node| matches!(node, Node::Element(e) if is_text_content(e)));
    run.children
        .retain(|node| !matches!(node, Node::Element(e) if is_text_content(e)));
    let at = position.unwrap_or(run.children.len());
    run.children
        .splice(at..at, text_content(text).into_iter().map(Node::Element));
}

pub fn text_element(text: &str) -> Element {
    Element::new(T)
        .with_attr("xml:space", "preserve")
        .with_text(text)
}

/// Paragraph text as the concatenation of its direct runs
pub fn paragraph_text(paragraph: &Element) -> String {
    runs(paragraph).map(run_text).collect()
}

/// Section properties carried by a paragraph (all but the last section)
pub fn inline_section(paragraph: &Element) -> Option<&Element> {
    paragraph.child(PPR).and_then(|p| p.child(SECT_PR))
}

/// Paragraphs of a table, visited row → cell → paragraph
pub fn table_paragraphs_mut(table: &mut Element) -> impl Iterator<Item = &mut Element> {
    table
        .children_named_mut(TR)
        .flat_map(|row| row.children_named_mut(TC))
        .flat_map(|cell| cell.children_named_mut(P))
}

pub fn table_paragraphs(table: &Element) -> impl Iterator<Item = &Element> {
    table
        .children_named(TR)
        .flat_map(|row| row.children_named(TC))
        .flat_map(|cell| cell.children_named(P))
}

/// Merge the runs a token straddles into the run where it starts.
///
/// Returns the number of occurrences that were merged. Occurrences already
/// inside one run are left alone.
pub fn coalesce_runs(paragraph: &mut Element, token: &str) -> usize {
    if token.is_empty() {
        return 0;
    }
    let mut merged = 0;

    loop {
        let texts: Vec<String> = runs(paragraph).map(run_text).collect();
        let mut starts = Vec::with_capacity(texts.len());
        let mut offset = 0;
        for text in &texts {
            starts.push(offset);
            offset += text.len();
        }
        let full = texts.concat();

        let run_at = |pos: usize| -> usize {
            (0..texts.len())
                .rev()
                .find(|&i| starts[i] <= pos && !texts[i].is_empty())
                .unwrap_or(0)
        };

        let mut spanning = None;
        let mut from = 0;
        while let Some(rel) = full[from..].find(token) {
            let start = from + rel;
            let end = start + token.len();
            let (first, last) = (run_at(start), run_at(end - 1));
            if first != last {
                spanning = Some((end, first, last));
                break;
            }
            from = end;
        }

        let Some((end, first, last)) = spanning else {
            return merged;
        };

        let cut = end - starts[last];
        let mut head = texts[first].clone();
        for text in &texts[first + 1..last] {
            head.push_str(text);
        }
        head.push_str(&texts[last][..cut]);
        let tail = texts[last][cut..].to_string();

        for (i, run) in runs_mut(paragraph).enumerate() {
            if i == first {
                set_run_text(run, &head);
            } else if i == last {
                set_run_text(run, &tail);
            } else if i > first && i < last {
                set_run_text(run, "");
            }
        }
        merged += 1;
    }
}

/// Replace every occurrence of `token` in a paragraph, run by run.
///
/// Runs straddled by the token are merged first so the replacement keeps the
/// formatting of the run where the token starts.
pub fn replace_in_paragraph(paragraph: &mut Element, token: &str, value: &str) -> usize {
    if token.is_empty() || !paragraph_text(paragraph).contains(token) {
        return 0;
    }
    coalesce_runs(paragraph, token);

    let mut count = 0;
    for run in runs_mut(paragraph) {
        let text = run_text(run);
        let hits = text.matches(token).count();
        if hits > 0 {
            set_run_text(run, &text.replace(token, value));
            count += hits;
        }
    }
    count
}

/// Remove every run, keeping paragraph properties
pub fn clear_paragraph(paragraph: &mut Element) {
    paragraph.children.retain(|node| match node {
        Node::Element(e) => e.name == PPR,
        _ => false,
    });
}

/// Run carrying `text`, with newlines turned into `w:br` and tabs into `w:tab`
pub fn text_run(text: &str, properties: Option<Element>) -> Element {
    let mut run = Element::new(R);
    if let Some(rpr) = properties {
        run.push(rpr);
    }
    for node in text_content(text) {
        run.push(node);
    }
    run
}

pub fn bold_properties() -> Element {
    Element::new(RPR).with_child(Element::new("w:b"))
}

pub fn centered_paragraph() -> Element {
    Element::new(P).with_child(
        Element::new(PPR).with_child(Element::new("w:jc").with_attr("w:val", "center")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(xml: &str) -> Element {
        Element::parse_fragment(xml).unwrap()
    }

    #[test]
    fn test_replace_within_single_run_keeps_formatting() {
        let mut p = paragraph(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Provincia de «PROVINCIA».</w:t></w:r></w:p>"#,
        );
        assert_eq!(replace_in_paragraph(&mut p, "«PROVINCIA»", "PICHINCHA"), 1);
        assert_eq!(paragraph_text(&p), "Provincia de PICHINCHA.");
        assert!(runs(&p).next().unwrap().child(RPR).is_some());
    }

    #[test]
    fn test_token_split_across_runs_is_merged() {
        let mut p = paragraph(
            r#"<w:p><w:r><w:t>En «PARR</w:t></w:r><w:r><w:t>OQ</w:t></w:r><w:r><w:t>UIA» hoy</w:t></w:r></w:p>"#,
        );
        assert_eq!(coalesce_runs(&mut p, "«PARROQUIA»"), 1);
        let texts: Vec<_> = runs(&p).map(run_text).collect();
        assert_eq!(texts, vec!["En «PARROQUIA»", "", " hoy"]);

        assert_eq!(replace_in_paragraph(&mut p, "«PARROQUIA»", "TUMBACO"), 1);
        assert_eq!(paragraph_text(&p), "En TUMBACO hoy");
    }

    #[test]
    fn test_absent_token_leaves_paragraph_untouched() {
        let original = paragraph(r#"<w:p><w:r><w:t>sin marcadores</w:t></w:r></w:p>"#);
        let mut p = original.clone();
        assert_eq!(replace_in_paragraph(&mut p, "«X»", "y"), 0);
        assert_eq!(p, original);
    }

    fn child_names(run: &Element) -> Vec<String> {
        run.elements()
            .map(|e| {
                if e.name == T {
                    e.text()
                } else {
                    e.name.clone()
                }
            })
            .collect()
    }

    #[test]
    fn test_set_run_text_keeps_tab_position() {
        let mut p = paragraph(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Fecha:</w:t><w:tab/><w:t>«FECHA_DE_INFORME»</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraph_text(&p), "Fecha:\t«FECHA_DE_INFORME»");

        replace_in_paragraph(&mut p, "«FECHA_DE_INFORME»", "14 de febrero de 2025");
        let run = runs(&p).next().unwrap();
        assert_eq!(
            child_names(run),
            vec!["w:rPr", "Fecha:", "w:tab", "14 de febrero de 2025"]
        );
    }

    #[test]
    fn test_set_run_text_keeps_line_breaks_and_drawings() {
        let mut run = paragraph(
            r#"<w:r><w:drawing/><w:t>a</w:t><w:br/><w:t>b</w:t><w:br w:type="page"/></w:r>"#,
        );
        assert_eq!(run_text(&run), "a\nb");

        set_run_text(&mut run, "x\ny");
        assert_eq!(
            child_names(&run),
            vec!["w:drawing", "x", "w:br", "y", "w:br"]
        );
        assert_eq!(run.children_named(BR).last().unwrap().attr("w:type"), Some("page"));
    }

    #[test]
    fn test_text_run_breaks_lines() {
        let run = text_run("uno\ndos\ttres", Some(bold_properties()));
        assert_eq!(child_names(&run), vec!["w:rPr", "uno", "w:br", "dos", "w:tab", "tres"]);
        assert_eq!(run_text(&run), "uno\ndos\ttres");
    }

    #[test]
    fn test_table_paragraphs_order() {
        let table = paragraph(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let texts: Vec<_> = table_paragraphs(&table).map(paragraph_text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
