use std::path::PathBuf;

use eframe::egui::{self, Align, Align2, Layout, RichText, ScrollArea, TextEdit, TopBottomPanel};
use rt_core::grid::GridRow;

use crate::actions::{dispatch, AppAction};
use crate::prefs::session_prefs_path;
use crate::state::AppState;
use crate::theme;

pub fn launch() -> eframe::Result<()> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Resource Translator",
        options,
        Box::new(|cc| {
            theme::apply_base_theme(&cc.egui_ctx);
            Box::new(TranslateApp::new())
        }),
    )
}

pub struct TranslateApp {
    state: AppState,
    close_prompt: bool,
    allow_close: bool,
}

enum CloseChoice {
    Save,
    Discard,
    Cancel,
}

/// Owned copy of one grid row, so the grid can be drawn while actions are collected.
enum RowView {
    Header(String),
    Record {
        row: usize,
        source: String,
        name: String,
        localized: String,
        pending: bool,
    },
}

impl Default for TranslateApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslateApp {
    pub fn new() -> Self {
        let state = match session_prefs_path() {
            Some(path) => AppState::with_prefs(path),
            None => AppState::new(),
        };
        let mut app = Self {
            state,
            close_prompt: false,
            allow_close: false,
        };
        if app.state.has_pair_inputs() {
            app.run_action(AppAction::LoadPair);
        }
        app
    }

    fn run_action(&mut self, action: AppAction) {
        if let Err(err) = dispatch(&mut self.state, action) {
            tracing::debug!(%err, "action failed");
        }
    }

    fn load_if_ready(&mut self) {
        if self.state.has_pair_inputs() {
            self.run_action(AppAction::LoadPair);
        }
    }

    fn draw_menu(&mut self, ui: &mut egui::Ui) {
        let loaded = self.state.session.is_loaded();
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open source file...").clicked() {
                    ui.close_menu();
                    if let Some(path) =
                        pick_xml("Select a File as Source Translation", Some("english.xml"))
                    {
                        self.run_action(AppAction::SetSourcePath(path.display().to_string()));
                        self.load_if_ready();
                    }
                }
                if ui.button("Open destination file...").clicked() {
                    ui.close_menu();
                    if let Some(path) =
                        pick_xml("Select the Language File you want to Translate", None)
                    {
                        self.run_action(AppAction::SetDestinationPath(
                            path.display().to_string(),
                        ));
                        self.load_if_ready();
                    }
                }
                if ui.add_enabled(loaded, egui::Button::new("Reload")).clicked() {
                    ui.close_menu();
                    self.run_action(AppAction::Reload);
                }
                ui.separator();
                if ui.add_enabled(loaded, egui::Button::new("Save")).clicked() {
                    ui.close_menu();
                    self.run_action(AppAction::Save);
                }
                if ui
                    .add_enabled(loaded, egui::Button::new("Save As..."))
                    .clicked()
                {
                    ui.close_menu();
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Save Translation As")
                        .add_filter("XML files", &["xml"])
                        .save_file()
                    {
                        self.run_action(AppAction::SaveAs(path));
                    }
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.close_menu();
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Source");
            let mut source = self.state.source_input.clone();
            if ui
                .add(TextEdit::singleline(&mut source).desired_width(280.0))
                .changed()
            {
                self.run_action(AppAction::SetSourcePath(source));
            }
            ui.label("Destination");
            let mut destination = self.state.destination_input.clone();
            if ui
                .add(TextEdit::singleline(&mut destination).desired_width(280.0))
                .changed()
            {
                self.run_action(AppAction::SetDestinationPath(destination));
            }
            if ui
                .add_enabled(self.state.has_pair_inputs(), egui::Button::new("Load"))
                .clicked()
            {
                self.run_action(AppAction::LoadPair);
            }
            ui.separator();
            let mut pending_only = self.state.show_pending_only;
            if ui.checkbox(&mut pending_only, "Show pending only").changed() {
                self.run_action(AppAction::SetShowPendingOnly(pending_only));
            }
        });
    }

    fn row_views(&self) -> Vec<RowView> {
        self.state
            .grid
            .rows()
            .iter()
            .enumerate()
            .filter_map(|(row, grid_row)| match grid_row {
                GridRow::PageHeader { name } => Some(RowView::Header(name.clone())),
                GridRow::Record { index } => {
                    self.state
                        .session
                        .record(*index)
                        .map(|record| RowView::Record {
                            row,
                            source: record.resource_value.clone(),
                            name: record.resource_name.clone(),
                            localized: record.localized_value.clone(),
                            pending: record.is_pending(),
                        })
                }
            })
            .collect()
    }

    fn draw_grid(&mut self, ui: &mut egui::Ui) {
        if !self.state.session.is_loaded() {
            ui.centered_and_justified(|ui| {
                ui.label("Open a source and a destination file to start.");
            });
            return;
        }

        let rows = self.row_views();
        let text_color = ui.visuals().text_color();
        let mut actions = Vec::new();
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("translations")
                    .num_columns(3)
                    .striped(true)
                    .min_col_width(160.0)
                    .show(ui, |ui| {
                        for view in rows {
                            match view {
                                RowView::Header(name) => {
                                    ui.label(
                                        RichText::new(name)
                                            .strong()
                                            .background_color(theme::PAGE_HEADER_BG),
                                    );
                                    ui.end_row();
                                    ui.label(RichText::new("Original Resource").strong());
                                    ui.label(RichText::new("Resource Name").strong());
                                    ui.label(RichText::new("Localized Resource").strong());
                                    ui.end_row();
                                }
                                RowView::Record {
                                    row,
                                    source,
                                    name,
                                    mut localized,
                                    pending,
                                } => {
                                    ui.label(RichText::new(source).background_color(theme::READONLY_BG));
                                    ui.label(RichText::new(name).background_color(theme::READONLY_BG));
                                    let color = if pending { theme::PENDING_TEXT } else { text_color };
                                    let response = ui.add(
                                        TextEdit::multiline(&mut localized)
                                            .desired_rows(1)
                                            .desired_width(f32::INFINITY)
                                            .text_color(color),
                                    );
                                    if response.changed() {
                                        actions.push(AppAction::EditCell {
                                            row,
                                            value: localized.clone(),
                                        });
                                    }
                                    response.context_menu(|ui| {
                                        if ui.button("Auto Translate").clicked() {
                                            actions.push(AppAction::AutoTranslate { row });
                                            ui.close_menu();
                                        }
                                    });
                                    ui.end_row();
                                }
                            }
                        }
                    });
            });

        for action in actions {
            self.run_action(action);
        }
    }

    fn draw_error(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.error.clone() else {
            return;
        };
        let mut dismiss = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });
        if dismiss {
            self.run_action(AppAction::DismissError);
        }
    }

    fn guard_close(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested())
            && !self.allow_close
            && self.state.session.has_unsaved_changes()
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.close_prompt = true;
        }
        if !self.close_prompt {
            return;
        }

        let mut choice = None;
        egui::Window::new("Save")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Save changes before exiting?");
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        choice = Some(CloseChoice::Save);
                    }
                    if ui.button("No").clicked() {
                        choice = Some(CloseChoice::Discard);
                    }
                    if ui.button("Cancel").clicked() {
                        choice = Some(CloseChoice::Cancel);
                    }
                });
            });

        match choice {
            Some(CloseChoice::Save) => {
                self.close_prompt = false;
                // A failed save keeps the window open with the error shown.
                if dispatch(&mut self.state, AppAction::Save).is_ok() {
                    self.allow_close = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
            Some(CloseChoice::Discard) => {
                self.close_prompt = false;
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Some(CloseChoice::Cancel) => {
                self.close_prompt = false;
            }
            None => {}
        }
    }
}

fn pick_xml(title: &str, file_name: Option<&str>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("XML files", &["xml"]);
    if let Some(name) = file_name {
        dialog = dialog.set_file_name(name);
    }
    dialog.pick_file()
}

impl eframe::App for TranslateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.session.is_loaded()
            && ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S))
        {
            self.run_action(AppAction::Save);
        }

        TopBottomPanel::top("menu_toolbar").show(ctx, |ui| {
            self.draw_menu(ui);
            ui.separator();
            self.draw_toolbar(ui);
        });

        TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                ui.label(self.state.status_line());
                ui.separator();
                ui.label(RichText::new(&self.state.status).small());
                if self.state.session.has_unsaved_changes() {
                    ui.label(RichText::new("modified").color(theme::PENDING_TEXT));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_grid(ui);
        });

        self.draw_error(ctx);
        self.guard_close(ctx);
    }
}
