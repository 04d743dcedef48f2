//! Placeholder substitution over body, headers and footers

use crate::models::{tokens, FillSummary, PlaceholderMap, ScheduleDateValues, SupervisorRule};
use crate::ooxml::wml::{self, P, TBL};
use crate::ooxml::{DocxDocument, Element, HeaderFooterKind};
use anyhow::{anyhow, Result};
use tracing::{debug, warn};

/// Hands out the schedule-date renderings in occurrence order.
///
/// One sequence is shared by the whole traversal; once the three renderings
/// are used up further occurrences stay unresolved.
#[derive(Debug, Clone)]
pub struct ScheduleDates<'a> {
    values: [&'a str; 3],
    next: usize,
    unresolved: usize,
}

impl<'a> ScheduleDates<'a> {
    pub fn new(values: &'a ScheduleDateValues) -> Self {
        Self {
            values: values.in_order(),
            next: 0,
            unresolved: 0,
        }
    }

    pub fn next_value(&mut self) -> Option<&'a str> {
        let value = self.values.get(self.next).copied();
        match value {
            Some(_) => self.next += 1,
            None => self.unresolved += 1,
        }
        value
    }

    pub fn resolved(&self) -> usize {
        self.next
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved
    }
}

/// Fill every placeholder in the document.
///
/// Traversal order is body, then header parts, then footer parts. The
/// supervisor rule only touches table cells of the body.
pub fn fill_document(
    doc: &mut DocxDocument,
    map: &PlaceholderMap,
    rule: &SupervisorRule,
) -> Result<FillSummary> {
    let mut summary = FillSummary::default();
    let mut dates = ScheduleDates::new(&map.schedule);

    let body = doc
        .body_mut()
        .ok_or_else(|| anyhow!("Document has no body"))?;
    fill_container(body, map, &mut dates, Some(rule), &mut summary);

    for kind in [HeaderFooterKind::Header, HeaderFooterKind::Footer] {
        for part in doc.header_footer_parts(kind) {
            if let Some(root) = doc.part_root_mut(&part) {
                debug!(part = %part, "filling placeholders");
                fill_container(root, map, &mut dates, None, &mut summary);
            }
        }
    }

    summary.schedule_dates_resolved = dates.resolved();
    summary.schedule_dates_unresolved = dates.unresolved();
    if summary.schedule_dates_unresolved > 0 {
        warn!(
            extra = summary.schedule_dates_unresolved,
            "schedule date placeholder appears more than three times"
        );
    }
    debug!(?summary, "fill complete");
    Ok(summary)
}

/// Paragraphs and tables directly under `container`
fn fill_container(
    container: &mut Element,
    map: &PlaceholderMap,
    dates: &mut ScheduleDates<'_>,
    rule: Option<&SupervisorRule>,
    summary: &mut FillSummary,
) {
    for element in container.elements_mut() {
        if element.name == P {
            fill_paragraph(element, map, dates, summary);
        } else if element.name == TBL {
            for paragraph in wml::table_paragraphs_mut(element) {
                fill_paragraph(paragraph, map, dates, summary);
                if let Some(rule) = rule {
                    apply_supervisor_rule(paragraph, rule, summary);
                }
            }
        }
    }
}

pub fn fill_paragraph(
    paragraph: &mut Element,
    map: &PlaceholderMap,
    dates: &mut ScheduleDates<'_>,
    summary: &mut FillSummary,
) {
    let text = wml::paragraph_text(paragraph);
    if !text.contains('«') {
        return;
    }

    if text.contains(tokens::SCHEDULE_DATE) {
        summary.merged_runs += wml::coalesce_runs(paragraph, tokens::SCHEDULE_DATE);
        replace_schedule_dates(paragraph, dates);
    }

    for (token, value) in map.iter() {
        if !text.contains(token) {
            continue;
        }
        summary.merged_runs += wml::coalesce_runs(paragraph, token);
        summary.replacements += wml::replace_in_paragraph(paragraph, token, value);
    }
}

/// Each occurrence takes the next rendering; exhausted ones stay verbatim
fn replace_schedule_dates(paragraph: &mut Element, dates: &mut ScheduleDates<'_>) {
    for run in wml::runs_mut(paragraph) {
        let text = wml::run_text(run);
        if !text.contains(tokens::SCHEDULE_DATE) {
            continue;
        }
        let mut pieces = text.split(tokens::SCHEDULE_DATE);
        let mut rebuilt = pieces.next().unwrap_or_default().to_string();
        for piece in pieces {
            match dates.next_value() {
                Some(value) => rebuilt.push_str(value),
                None => rebuilt.push_str(tokens::SCHEDULE_DATE),
            }
            rebuilt.push_str(piece);
        }
        wml::set_run_text(run, &rebuilt);
    }
}

fn apply_supervisor_rule(paragraph: &mut Element, rule: &SupervisorRule, summary: &mut FillSummary) {
    for (from, to) in rule.replacements() {
        summary.supervisor_replacements += wml::replace_in_paragraph(paragraph, from, to);
    }
}
