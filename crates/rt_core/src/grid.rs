//! Maps grid rows to records so the presentation layer never stores lookup data on widgets.

use crate::model::Translation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    PageHeader { name: String },
    Record { index: usize },
}

/// Builds the visible rows. A header starts every run of records from one page;
/// pages with no visible record get no header.
pub fn build_rows(records: &[Translation], pending_only: bool) -> Vec<GridRow> {
    let mut rows = Vec::with_capacity(records.len());
    let mut current_page: Option<&str> = None;
    for (index, record) in records.iter().enumerate() {
        if pending_only && !record.is_pending() {
            continue;
        }
        if current_page != Some(record.page_name.as_str()) {
            rows.push(GridRow::PageHeader {
                name: record.page_name.clone(),
            });
            current_page = Some(record.page_name.as_str());
        }
        rows.push(GridRow::Record { index });
    }
    rows
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridView {
    rows: Vec<GridRow>,
    pending_only: bool,
}

impl GridView {
    pub fn new(pending_only: bool) -> Self {
        Self {
            rows: Vec::new(),
            pending_only,
        }
    }

    pub fn pending_only(&self) -> bool {
        self.pending_only
    }

    pub fn set_pending_only(&mut self, pending_only: bool, records: &[Translation]) {
        self.pending_only = pending_only;
        self.rebuild(records);
    }

    pub fn rebuild(&mut self, records: &[Translation]) {
        self.rows = build_rows(records, self.pending_only);
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn record_index(&self, row: usize) -> Option<usize> {
        match self.rows.get(row)? {
            GridRow::Record { index } => Some(*index),
            GridRow::PageHeader { .. } => None,
        }
    }

    pub fn visible_records(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, GridRow::Record { .. }))
            .count()
    }
}
