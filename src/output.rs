use std::fmt::Write as _;

use crate::domain::StructureRecord;

/// Renders a record as the CLI's labeled-line block.
pub fn render_record(record: &StructureRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- {} ---", record.id);
    push_field(&mut out, "title", record.title.as_deref());
    push_field(&mut out, "classification", record.classification.as_deref());
    push_field(&mut out, "organism", record.organism.as_deref());
    push_field(&mut out, "method", record.method.as_deref());
    push_field(&mut out, "resolution", record.resolution.as_deref());
    push_field(
        &mut out,
        "publication_title",
        record.publication_title.as_deref(),
    );
    let authors = record.authors.join(", ");
    push_field(
        &mut out,
        "authors",
        Some(authors.as_str()).filter(|a| !a.is_empty()),
    );
    push_field(&mut out, "doi", record.doi.as_deref());
    let related = record
        .related_structures
        .as_ref()
        .map(|entries| entries.join(", "));
    push_field(&mut out, "related_structures", related.as_deref());
    push_field(&mut out, "abstract", record.abstract_text.as_deref());
    push_field(&mut out, "local_image", record.local_image_path.as_deref());
    out
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(out, "{label}: {}", value.unwrap_or("-"));
}
