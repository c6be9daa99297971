//! The editing session for one open (source, destination) file pair.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::formats::resources::{write_translations, LoadError, SaveError};
use crate::matcher::{load_pair, LoadReport};
use crate::model::Translation;
use crate::translate::{TranslateError, Translator};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no translation for page {page:?}, resource {resource:?}")]
    UnknownKey { page: String, resource: String },
    #[error("no translation at row {0}")]
    UnknownRow(usize),
}

#[derive(Debug, Error)]
pub enum AutoTranslateError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    source_path: Option<PathBuf>,
    destination_path: Option<PathBuf>,
    records: Vec<Translation>,
    namespaces: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    report: LoadReport,
    unsaved_changes: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the whole session from the two files. On error nothing changes.
    pub fn load(&mut self, source: &Path, destination: &Path) -> Result<&LoadReport, LoadError> {
        let outcome = load_pair(source, destination)?;
        self.source_path = Some(source.to_path_buf());
        self.destination_path = Some(destination.to_path_buf());
        self.records = outcome.records;
        self.namespaces = outcome.namespaces;
        self.attributes = outcome.attributes;
        self.unsaved_changes = outcome.report.structural_changes_pending;
        self.report = outcome.report;
        Ok(&self.report)
    }

    /// Loads the current pair again, discarding unsaved edits.
    pub fn reload(&mut self) -> Result<Option<&LoadReport>, LoadError> {
        let (Some(source), Some(destination)) = (self.source_path.clone(), self.destination_path.clone())
        else {
            return Ok(None);
        };
        self.load(&source, &destination).map(Some)
    }

    pub fn is_loaded(&self) -> bool {
        self.destination_path.is_some()
    }

    pub fn records(&self) -> &[Translation] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Translation> {
        self.records.get(index)
    }

    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn destination_path(&self) -> Option<&Path> {
        self.destination_path.as_deref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    /// Pending rows in the current (possibly edited) list.
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|record| record.is_pending()).count()
    }

    /// Updates the first record with the given key.
    pub fn edit(&mut self, page: &str, resource: &str, value: &str) -> Result<(), LookupError> {
        let index = self
            .records
            .iter()
            .position(|record| record.page_name == page && record.resource_name == resource)
            .ok_or_else(|| LookupError::UnknownKey {
                page: page.to_string(),
                resource: resource.to_string(),
            })?;
        self.edit_at(index, value)
    }

    pub fn edit_at(&mut self, index: usize, value: &str) -> Result<(), LookupError> {
        let record = self
            .records
            .get_mut(index)
            .ok_or(LookupError::UnknownRow(index))?;
        if record.localized_value != value {
            record.localized_value.clear();
            record.localized_value.push_str(value);
            self.unsaved_changes = true;
        }
        Ok(())
    }

    /// Replaces the row's localized text with the translator's output for its source text.
    pub fn auto_translate_at(
        &mut self,
        index: usize,
        translator: &dyn Translator,
    ) -> Result<(), AutoTranslateError> {
        let source = self
            .records
            .get(index)
            .ok_or(LookupError::UnknownRow(index))?
            .resource_value
            .clone();
        let translated = translator.translate(&source)?;
        self.edit_at(index, &translated)?;
        Ok(())
    }

    /// Writes to the destination file. Returns how many duplicate rows were dropped.
    pub fn save(&mut self) -> Result<usize, SaveError> {
        let Some(path) = self.destination_path.clone() else {
            return Err(SaveError::NoDestination);
        };
        self.save_as(&path)
    }

    /// Writes to `path` and makes it the destination on success.
    pub fn save_as(&mut self, path: &Path) -> Result<usize, SaveError> {
        let written = write_translations(path, &self.records, &self.namespaces, &self.attributes)?;
        let dropped = self.records.len() - written.len();
        self.records = written;
        self.destination_path = Some(path.to_path_buf());
        self.unsaved_changes = false;
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::resources::read_document;

    const SOURCE: &str = r#"<Resources code="en">
  <page name="General">
    <Resource tag="Title">Hello</Resource>
    <Resource tag="Body">Welcome</Resource>
  </page>
  <page name="Admin">
    <Resource tag="Save">Save</Resource>
  </page>
</Resources>"#;

    const DESTINATION: &str = r#"<Resources code="fr" xmlns:x="urn:example">
  <page name="General">
    <Resource tag="Title">Bonjour</Resource>
    <Resource tag="Body">Bienvenue</Resource>
  </page>
  <page name="Admin">
    <Resource tag="Save">Enregistrer</Resource>
  </page>
</Resources>"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        source: PathBuf,
        destination: PathBuf,
    }

    fn fixture(source: &str, destination: &str) -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("english.xml");
        let dst = dir.path().join("french.xml");
        std::fs::write(&src, source).expect("write source");
        std::fs::write(&dst, destination).expect("write destination");
        Fixture {
            _dir: dir,
            source: src,
            destination: dst,
        }
    }

    fn loaded(fx: &Fixture) -> EditorSession {
        let mut session = EditorSession::new();
        session.load(&fx.source, &fx.destination).expect("load");
        session
    }

    fn triples(records: &[Translation]) -> Vec<(String, String, String)> {
        records
            .iter()
            .map(|r| (r.page_name.clone(), r.resource_name.clone(), r.localized_value.clone()))
            .collect()
    }

    #[test]
    fn t_sess_001_round_trip_without_edits() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        assert!(!session.has_unsaved_changes());
        let before = triples(session.records());

        session.save().expect("save");
        let doc = read_document(&fx.destination).expect("read saved");
        assert_eq!(doc.namespaces, vec![("x".to_string(), "urn:example".to_string())]);
        assert_eq!(doc.attributes, vec![("code".to_string(), "fr".to_string())]);

        let mut reloaded = EditorSession::new();
        reloaded.load(&fx.source, &fx.destination).expect("reload");
        assert_eq!(triples(reloaded.records()), before);
    }

    #[test]
    fn t_sess_002_edit_changes_only_the_target_record() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        let before = session.records().to_vec();

        session.edit("General", "Body", "Salut").expect("edit");
        assert!(session.has_unsaved_changes());
        for (index, (old, new)) in before.iter().zip(session.records()).enumerate() {
            if index == 1 {
                assert_eq!(new.localized_value, "Salut");
                assert_eq!(new.resource_value, old.resource_value);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn t_sess_003_unknown_keys_and_rows_are_lookup_errors() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        assert_eq!(
            session.edit("General", "Missing", "x"),
            Err(LookupError::UnknownKey {
                page: "General".to_string(),
                resource: "Missing".to_string(),
            })
        );
        assert_eq!(session.edit_at(99, "x"), Err(LookupError::UnknownRow(99)));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn t_sess_004_same_value_edit_is_not_a_change() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        session.edit_at(0, "Bonjour").expect("edit");
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn t_sess_005_failed_load_keeps_previous_state() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        session.edit_at(0, "Coucou").expect("edit");
        let records = session.records().to_vec();

        let bad = fx.destination.with_file_name("broken.xml");
        std::fs::write(&bad, "<Resources><page name=\"x\"></Resources>").expect("write bad");
        assert!(session.load(&fx.source, &bad).is_err());
        assert_eq!(session.records(), records.as_slice());
        assert_eq!(session.destination_path(), Some(fx.destination.as_path()));
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn t_sess_006_missing_entries_mark_pending_and_are_added_on_save() {
        let fx = fixture(SOURCE, "<Resources code=\"de\"></Resources>");
        let mut session = loaded(&fx);
        assert!(session.has_unsaved_changes());
        assert_eq!(session.report().not_translated, 3);
        assert_eq!(session.pending_count(), 3);

        session.edit("General", "Title", "Hallo").expect("edit");
        assert_eq!(session.pending_count(), 2);
        session.save().expect("save");
        assert!(!session.has_unsaved_changes());

        let doc = read_document(&fx.destination).expect("read saved");
        assert_eq!(doc.code(), Some("de"));
        assert_eq!(doc.resource_count(), 3);
        assert_eq!(doc.pages[0].resources[0].value, "Hallo");
    }

    #[test]
    fn t_sess_007_save_collapses_duplicates_keeping_first() {
        let dst = r#"<Resources>
  <page name="General">
    <Resource tag="Title">Bonjour</Resource>
    <Resource tag="Title">Salut</Resource>
  </page>
</Resources>"#;
        let src = r#"<Resources><page name="General"><Resource tag="Title">Hello</Resource></page></Resources>"#;
        let fx = fixture(src, dst);
        let mut session = loaded(&fx);
        assert_eq!(session.records().len(), 2);

        // An edit on the second row is lost by first-wins deduplication.
        session.edit_at(1, "Coucou").expect("edit second row");
        let dropped = session.save().expect("save");
        assert_eq!(dropped, 1);
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].localized_value, "Bonjour");
    }

    #[test]
    fn t_sess_008_failed_save_keeps_records_and_flag() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        session.edit_at(2, "Sauver").expect("edit");
        let records = session.records().to_vec();

        let bad = fx.destination.with_file_name("no-such-dir").join("out.xml");
        assert!(matches!(session.save_as(&bad), Err(SaveError::Io { .. })));
        assert_eq!(session.records(), records.as_slice());
        assert!(session.has_unsaved_changes());
        assert_eq!(session.destination_path(), Some(fx.destination.as_path()));
    }

    #[test]
    fn t_sess_009_reload_discards_edits() {
        let fx = fixture(SOURCE, DESTINATION);
        let mut session = loaded(&fx);
        session.edit_at(0, "Coucou").expect("edit");
        session.reload().expect("reload");
        assert_eq!(session.records()[0].localized_value, "Bonjour");
        assert!(!session.has_unsaved_changes());

        let mut empty = EditorSession::new();
        assert!(empty.reload().expect("no pair").is_none());
        assert!(matches!(empty.save(), Err(SaveError::NoDestination)));
    }

    #[test]
    fn t_sess_010_auto_translate_uses_source_text() {
        let fx = fixture(SOURCE, "<Resources></Resources>");
        let mut session = loaded(&fx);
        let shout = |text: &str| Ok::<_, TranslateError>(format!("{}!", text.to_uppercase()));
        session.auto_translate_at(0, &shout).expect("translate");
        assert_eq!(session.records()[0].localized_value, "HELLO!");

        let err = session.auto_translate_at(42, &shout).expect_err("bad row");
        assert!(matches!(err, AutoTranslateError::Lookup(LookupError::UnknownRow(42))));
    }
}
