use std::path::PathBuf;

use rt_core::grid::GridView;
use rt_core::model::Translation;
use rt_core::session::EditorSession;
use rt_core::translate::Translator;

use crate::prefs::{load_session_prefs, save_session_prefs, SessionPrefs};

pub struct AppState {
    pub session: EditorSession,
    pub grid: GridView,

    pub source_input: String,
    pub destination_input: String,
    pub show_pending_only: bool,

    pub status: String,
    /// Last failure, shown as a blocking message until dismissed.
    pub error: Option<String>,

    pub translator: Option<Box<dyn Translator>>,
    prefs_path: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State without persisted settings.
    pub fn new() -> Self {
        Self {
            session: EditorSession::new(),
            grid: GridView::new(false),
            source_input: String::new(),
            destination_input: String::new(),
            show_pending_only: false,
            status: String::new(),
            error: None,
            translator: None,
            prefs_path: None,
        }
    }

    /// State backed by a prefs file; restores the remembered paths and toggle.
    pub fn with_prefs(path: PathBuf) -> Self {
        let mut state = Self::new();
        match load_session_prefs(&path) {
            Ok(prefs) => {
                state.source_input = prefs.source_path;
                state.destination_input = prefs.destination_path;
                state.show_pending_only = prefs.show_pending_only;
                state.grid = GridView::new(prefs.show_pending_only);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable prefs");
            }
        }
        state.prefs_path = Some(path);
        state
    }

    pub fn records(&self) -> &[Translation] {
        self.session.records()
    }

    pub fn has_pair_inputs(&self) -> bool {
        !self.source_input.trim().is_empty() && !self.destination_input.trim().is_empty()
    }

    pub fn refresh_grid(&mut self) {
        self.grid.rebuild(self.session.records());
    }

    pub fn status_line(&self) -> String {
        if !self.session.is_loaded() {
            return String::new();
        }
        let report = self.session.report();
        format!(
            "Total Resources: {}; Resources Not Translated: {}",
            report.total_resources, report.not_translated
        )
    }

    pub fn fail(&mut self, message: String) -> String {
        tracing::error!("{message}");
        self.error = Some(message.clone());
        message
    }

    pub fn persist_prefs(&mut self) {
        let Some(path) = self.prefs_path.as_ref() else {
            return;
        };
        let prefs = SessionPrefs {
            source_path: self.source_input.clone(),
            destination_path: self.destination_input.clone(),
            show_pending_only: self.show_pending_only,
        };
        if let Err(err) = save_session_prefs(path, &prefs) {
            tracing::warn!(%err, "failed to save prefs");
            self.status = format!("Settings not saved: {err}");
        }
    }
}
