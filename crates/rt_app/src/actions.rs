use std::path::{Path, PathBuf};

use crate::state::AppState;

pub enum AppAction {
    SetSourcePath(String),
    SetDestinationPath(String),
    LoadPair,
    Reload,
    EditCell { row: usize, value: String },
    AutoTranslate { row: usize },
    SetShowPendingOnly(bool),
    Save,
    SaveAs(PathBuf),
    DismissError,
}

pub fn dispatch(state: &mut AppState, action: AppAction) -> Result<(), String> {
    match action {
        AppAction::SetSourcePath(value) => {
            state.source_input = value;
        }
        AppAction::SetDestinationPath(value) => {
            state.destination_input = value;
        }
        AppAction::LoadPair => {
            if !state.has_pair_inputs() {
                return Err(state.fail("Select a source and a destination file first".to_string()));
            }
            let source = PathBuf::from(state.source_input.trim());
            let destination = PathBuf::from(state.destination_input.trim());
            load_pair(state, &source, &destination)?;
            state.persist_prefs();
        }
        AppAction::Reload => {
            let result = state.session.reload().map(|report| report.is_some());
            match result {
                Ok(true) => {
                    state.refresh_grid();
                    state.status = "Reloaded, unsaved edits discarded".to_string();
                }
                Ok(false) => {}
                Err(err) => return Err(state.fail(format!("Error loading files. {err}"))),
            }
        }
        AppAction::EditCell { row, value } => {
            let Some(index) = state.grid.record_index(row) else {
                return Err(state.fail(format!("Row {row} is not an editable translation")));
            };
            if let Err(err) = state.session.edit_at(index, &value) {
                return Err(state.fail(err.to_string()));
            }
        }
        AppAction::AutoTranslate { row } => {
            let Some(index) = state.grid.record_index(row) else {
                return Err(state.fail(format!("Row {row} is not an editable translation")));
            };
            let Some(translator) = state.translator.as_deref() else {
                state.status = "Auto Translate: no translator configured".to_string();
                return Ok(());
            };
            if let Err(err) = state.session.auto_translate_at(index, translator) {
                return Err(state.fail(format!("Auto Translate failed: {err}")));
            }
            state.status = "Auto Translate applied".to_string();
        }
        AppAction::SetShowPendingOnly(value) => {
            state.show_pending_only = value;
            let records = state.session.records();
            state.grid.set_pending_only(value, records);
            state.persist_prefs();
        }
        AppAction::Save => {
            let result = state.session.save();
            match result {
                Ok(dropped) => saved(state, dropped),
                Err(err) => {
                    return Err(state.fail(format!("Error saving destination translation: {err}")))
                }
            }
        }
        AppAction::SaveAs(path) => {
            let result = state.session.save_as(&path);
            match result {
                Ok(dropped) => {
                    state.destination_input = path.display().to_string();
                    saved(state, dropped);
                    state.persist_prefs();
                }
                Err(err) => {
                    return Err(state.fail(format!("Error saving destination translation: {err}")))
                }
            }
        }
        AppAction::DismissError => {
            state.error = None;
        }
    }

    Ok(())
}

fn load_pair(state: &mut AppState, source: &Path, destination: &Path) -> Result<(), String> {
    let result = state.session.load(source, destination).map(|report| {
        (report.source_code.clone(), report.destination_code.clone())
    });
    match result {
        Ok((source_code, destination_code)) => {
            state.refresh_grid();
            state.error = None;
            state.status = format!(
                "Loaded {} -> {}",
                source_code.as_deref().unwrap_or("?"),
                destination_code.as_deref().unwrap_or("?")
            );
            Ok(())
        }
        Err(err) => Err(state.fail(format!("Error loading files. {err}"))),
    }
}

fn saved(state: &mut AppState, dropped: usize) {
    state.refresh_grid();
    state.status = match (state.session.destination_path(), dropped) {
        (Some(path), 0) => format!("Saved {}", path.display()),
        (Some(path), n) => format!("Saved {} ({n} duplicate entries removed)", path.display()),
        (None, _) => "Saved".to_string(),
    };
}
