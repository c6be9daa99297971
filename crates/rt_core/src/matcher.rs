//! Pairs every source resource with its destination counterpart.

use std::collections::HashMap;
use std::path::Path;

use crate::formats::resources::{read_document, LoadError, Page, ResourceDocument, ROOT_ELEMENT};
use crate::model::{eq_ignore_case, Translation};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub source_code: Option<String>,
    pub destination_code: Option<String>,
    /// Source resources visited.
    pub total_resources: usize,
    /// Rows whose localized text equals the source text, ignoring case; a missing entry counts once.
    pub not_translated: usize,
    pub missing_in_destination: usize,
    /// Extra destination entries sharing a `(page, tag)` key with an earlier one.
    pub duplicate_destination_entries: usize,
    /// The destination lacks entries that a save would add.
    pub structural_changes_pending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub records: Vec<Translation>,
    pub namespaces: Vec<(String, String)>,
    pub attributes: Vec<(String, String)>,
    pub report: LoadReport,
}

pub fn load_pair(source: &Path, destination: &Path) -> Result<MatchOutcome, LoadError> {
    let source_doc = read_document(source)?;
    let destination_doc = read_document(destination)?;
    let outcome = match_documents(&source_doc, &destination_doc);
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        total = outcome.report.total_resources,
        not_translated = outcome.report.not_translated,
        missing = outcome.report.missing_in_destination,
        "loaded translation pair"
    );
    Ok(outcome)
}

/// Walks the source document in order and looks every resource up in the destination.
///
/// Pages and resources that exist only in the destination are never visited.
pub fn match_documents(source: &ResourceDocument, destination: &ResourceDocument) -> MatchOutcome {
    if source.root_name != ROOT_ELEMENT {
        tracing::warn!(root = %source.root_name, "source root is not <{ROOT_ELEMENT}>");
    }
    // Only `/Resources/page` entries are translations.
    let destination_pages: &[Page] = if destination.root_name == ROOT_ELEMENT {
        &destination.pages
    } else {
        tracing::warn!(
            root = %destination.root_name,
            "destination root is not <{ROOT_ELEMENT}>, treating every entry as missing"
        );
        &[]
    };

    let mut index: HashMap<(&str, &str), Vec<&str>> = HashMap::new();
    for page in destination_pages {
        for resource in &page.resources {
            index
                .entry((page.name.as_str(), resource.tag.as_str()))
                .or_default()
                .push(resource.value.as_str());
        }
    }

    let mut report = LoadReport {
        source_code: source.code().map(str::to_string),
        destination_code: destination.code().map(str::to_string),
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(source.resource_count());

    for page in &source.pages {
        for resource in &page.resources {
            report.total_resources += 1;
            let matches = index
                .get(&(page.name.as_str(), resource.tag.as_str()))
                .map(Vec::as_slice)
                .unwrap_or_default();

            if matches.is_empty() {
                report.missing_in_destination += 1;
                report.not_translated += 1;
                records.push(Translation::new(
                    &page.name,
                    &resource.tag,
                    &resource.value,
                    &resource.value,
                ));
                continue;
            }

            if matches.len() > 1 {
                report.duplicate_destination_entries += matches.len() - 1;
                tracing::warn!(
                    page = %page.name,
                    tag = %resource.tag,
                    count = matches.len(),
                    "destination has duplicate entries"
                );
            }
            for value in matches {
                if eq_ignore_case(value, &resource.value) {
                    report.not_translated += 1;
                }
                records.push(Translation::new(&page.name, &resource.tag, &resource.value, value));
            }
        }
    }

    report.structural_changes_pending = report.missing_in_destination > 0;

    MatchOutcome {
        records,
        namespaces: destination.namespaces.clone(),
        attributes: destination.attributes.clone(),
        report,
    }
}
