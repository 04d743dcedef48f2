//! Replacement of the free-text recommendations block

use crate::ooxml::wml::{self, P, RPR};
use crate::ooxml::{DocxDocument, Element};
use anyhow::{anyhow, Result};
use tracing::debug;

/// Put `text` into the paragraphs between `heading` and `sentinel`.
///
/// The first paragraph of the span receives the text with the formatting of
/// its first run; the rest of the span is blanked. An empty span gets a new
/// paragraph after the heading. Returns `false` when the heading is absent.
pub fn replace_recommendations(
    doc: &mut DocxDocument,
    text: &str,
    heading: &str,
    sentinel: &str,
) -> Result<bool> {
    let body = doc
        .body_mut()
        .ok_or_else(|| anyhow!("Document has no body"))?;

    let Some(heading_index) = body
        .elements()
        .position(|e| e.name == P && wml::paragraph_text(e).contains(heading))
    else {
        return Ok(false);
    };

    let span: Vec<usize> = body
        .elements()
        .enumerate()
        .skip(heading_index + 1)
        .take_while(|(_, e)| !(e.name == P && wml::paragraph_text(e).contains(sentinel)))
        .filter(|(_, e)| e.name == P && wml::inline_section(e).is_none())
        .map(|(i, _)| i)
        .collect();

    match span.split_first() {
        Some((&first, rest)) => {
            for (i, paragraph) in body.elements_mut().enumerate() {
                if i == first {
                    write_text(paragraph, text);
                } else if rest.contains(&i) {
                    wml::clear_paragraph(paragraph);
                }
            }
            debug!(paragraphs = span.len(), "replaced recommendations");
        }
        None => {
            let mut paragraph = Element::new(P);
            write_text(&mut paragraph, text);
            body.insert_after_element(heading_index, paragraph);
            debug!("inserted recommendations paragraph");
        }
    }
    Ok(true)
}

fn write_text(paragraph: &mut Element, text: &str) {
    let properties = wml::runs(paragraph)
        .next()
        .and_then(|run| run.child(RPR))
        .cloned();
    wml::clear_paragraph(paragraph);
    paragraph.push(wml::text_run(text, properties));
}
