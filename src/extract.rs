//! Field extraction over the structure summary page.
//!
//! Every lookup is a structural query against known markup anchors; a missing
//! anchor leaves its field absent. Extraction never fails, whatever the input.

use scraper::{ElementRef, Html, Selector};

use crate::domain::{PdbId, StructureRecord};

/// Builds a record for `id` from the raw page HTML. `local_image_path` is
/// left unset; the orchestrator resolves it against the store.
pub fn extract_record(id: &PdbId, page: &str) -> StructureRecord {
    let doc = Html::parse_document(page);
    let mut record = StructureRecord::empty(id);

    record.title = select_first(&doc, "title").and_then(|el| normalized_text(el, true));
    record.classification =
        labeled_text(&doc, "header_classification").map(|text| capitalize(&text));
    record.organism = labeled_text(&doc, "header_organism");
    record.method = labeled_text(&doc, "exp_header_0_method").map(|text| capitalize(&text));
    record.resolution = labeled_text(&doc, "exp_header_0_em_resolution")
        .or_else(|| labeled_text(&doc, "exp_header_0_diffraction_resolution"));
    record.abstract_text = select_first(&doc, "#abstract").and_then(|el| normalized_text(el, false));

    extract_citation(&doc, &mut record);
    record
}

/// The citation block carries publication title, authors, DOI and related
/// structures. When the block is missing, all four stay at their defaults.
fn extract_citation(doc: &Html, record: &mut StructureRecord) {
    let Some(citation) = select_first(doc, "div#primarycitation") else {
        return;
    };

    record.publication_title = Selector::parse("h4")
        .ok()
        .and_then(|sel| citation.select(&sel).next())
        .map(|el| element_text(el).trim().to_string());

    if let Ok(sel) = Selector::parse("a.querySearchLink") {
        // Purely numeric link texts are citation footnote markers, not names.
        record.authors = citation
            .select(&sel)
            .map(|el| element_text(el).trim().to_string())
            .filter(|text| !is_numeric(text))
            .collect();
    }

    record.doi = select_first(doc, "li#pubmedDOI")
        .map(|el| element_text(el).replace("DOI:\u{a0}", "").trim().to_string());

    let related: Vec<String> = Selector::parse("li#citationPrimaryRelatedStructures a[href]")
        .ok()
        .map(|sel| {
            doc.select(&sel)
                .map(|el| element_text(el).trim().to_string())
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if !related.is_empty() {
        record.related_structures = Some(related);
    }
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel).next()
}

/// Labeled-text lookup by element id, with colon-prefix stripping.
fn labeled_text(doc: &Html, elem_id: &str) -> Option<String> {
    select_first(doc, &format!("#{elem_id}")).and_then(|el| normalized_text(el, true))
}

/// NBSP to space, trim, absent if empty; then the optional colon-prefix
/// strip keeps only what follows the first colon, trimmed again.
fn normalized_text(el: ElementRef<'_>, strip_colon_prefix: bool) -> Option<String> {
    let text = element_text(el).replace('\u{a0}', " ");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let text = if strip_colon_prefix {
        match text.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => text,
        }
    } else {
        text
    };
    Some(text.to_string())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// First character uppercased, remainder lowercased, so short labels render
/// as "Hydrolase" / "X-ray diffraction" whatever the page's casing.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_numeric())
}
