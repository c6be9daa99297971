use std::collections::HashSet;

/// One editable row: a source resource paired with its destination text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub page_name: String,
    pub resource_name: String,
    /// Source-language text. Only used for the pending comparison, never saved.
    pub resource_value: String,
    pub localized_value: String,
}

impl Translation {
    pub fn new(page_name: &str, resource_name: &str, resource_value: &str, localized_value: &str) -> Self {
        Self {
            page_name: page_name.to_string(),
            resource_name: resource_name.to_string(),
            resource_value: resource_value.to_string(),
            localized_value: localized_value.to_string(),
        }
    }

    pub fn key(&self) -> ResourceKey<'_> {
        ResourceKey {
            page_name: &self.page_name,
            resource_name: &self.resource_name,
        }
    }

    /// Heuristic "not yet translated": the destination text still reads like the source.
    pub fn is_pending(&self) -> bool {
        eq_ignore_case(&self.resource_value, &self.localized_value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKey<'a> {
    pub page_name: &'a str,
    pub resource_name: &'a str,
}

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

/// Keeps the first record for every `(page, resource)` key, in order.
///
/// This is not a merge: when two rows share a key, the later row's value is
/// dropped even if it was the one edited.
pub fn deduplicate(records: &[Translation]) -> Vec<Translation> {
    let mut seen: HashSet<ResourceKey<'_>> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.key()) {
            out.push(record.clone());
        }
    }
    let dropped = records.len() - out.len();
    if dropped > 0 {
        tracing::warn!(dropped, "duplicate translation keys dropped");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tr(page: &str, tag: &str, src: &str, dst: &str) -> Translation {
        Translation::new(page, tag, src, dst)
    }

    #[test]
    fn t_model_001_pending_is_case_insensitive() {
        assert!(tr("General", "Title", "Hello", "HELLO").is_pending());
        assert!(!tr("General", "Title", "Straße", "STRASSE").is_pending());
        assert!(tr("General", "Title", "Ärger", "ärger").is_pending());
        assert!(!tr("General", "Title", "Hello", "Bonjour").is_pending());
    }

    #[test]
    fn t_dedup_001_keeps_first_seen_value() {
        let records = vec![
            tr("General", "Title", "Hello", "Bonjour"),
            tr("General", "Title", "Hello", "Salut"),
            tr("General", "Body", "Text", "Texte"),
        ];
        let out = deduplicate(&records);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].localized_value, "Bonjour");
        assert_eq!(out[1].resource_name, "Body");
    }

    #[test]
    fn t_dedup_002_idempotent_and_identity_without_duplicates() {
        let records = vec![
            tr("A", "x", "1", "1"),
            tr("B", "x", "2", "two"),
            tr("A", "x", "1", "uno"),
            tr("A", "y", "3", "tres"),
        ];
        let once = deduplicate(&records);
        let twice = deduplicate(&once);
        assert_eq!(once, twice);

        let unique = vec![tr("A", "x", "1", "1"), tr("B", "x", "2", "two")];
        assert_eq!(deduplicate(&unique), unique);
    }

    #[test]
    fn t_dedup_003_same_tag_on_different_pages_is_not_duplicate() {
        let records = vec![tr("A", "Title", "a", "a"), tr("B", "Title", "b", "b")];
        assert_eq!(deduplicate(&records).len(), 2);
    }
}
