use std::path::PathBuf;

use rt_core::translate::Translator;

use crate::actions::{dispatch, AppAction};
use crate::state::AppState;

pub struct AppDriver {
    state: AppState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSnapshot {
    pub total_records: usize,
    pub visible_records: usize,
    pub pending_records: usize,
    pub total_resources: usize,
    pub not_translated: usize,
    pub unsaved_changes: bool,
    pub show_pending_only: bool,
    pub destination_path: Option<PathBuf>,
    pub status: String,
    pub error: Option<String>,
}

impl Default for AppDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDriver {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
        }
    }

    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn set_translator(&mut self, translator: impl Translator + 'static) {
        self.state.translator = Some(Box::new(translator));
    }

    pub fn dispatch(&mut self, action: AppAction) -> Result<(), String> {
        dispatch(&mut self.state, action)
    }

    /// Grid row of the first visible record with this key.
    pub fn row_of(&self, page: &str, resource: &str) -> Option<usize> {
        (0..self.state.grid.rows().len()).find(|&row| {
            self.state
                .grid
                .record_index(row)
                .and_then(|index| self.state.session.record(index))
                .map(|record| record.page_name == page && record.resource_name == resource)
                .unwrap_or(false)
        })
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let session = &self.state.session;
        AppSnapshot {
            total_records: session.records().len(),
            visible_records: self.state.grid.visible_records(),
            pending_records: session.pending_count(),
            total_resources: session.report().total_resources,
            not_translated: session.report().not_translated,
            unsaved_changes: session.has_unsaved_changes(),
            show_pending_only: self.state.show_pending_only,
            destination_path: session.destination_path().map(PathBuf::from),
            status: self.state.status.clone(),
            error: self.state.error.clone(),
        }
    }
}
