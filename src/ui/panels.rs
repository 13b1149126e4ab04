use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use house_price_dashboard::catalog;
use house_price_dashboard::model::ModelFamily;

use crate::state::{AppState, EvaluationView};

/// Rows shown in the data preview table.
const PREVIEW_ROWS: usize = 50;

// ---------------------------------------------------------------------------
// Left side panel – selectors
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data to display");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Feature histogram ----
            ui.strong("House data");
            let features = state.available_features();
            let mut feature = state.feature.clone();
            egui::ComboBox::from_id_salt("feature")
                .selected_text(&feature)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in features {
                        ui.selectable_value(&mut feature, name.to_string(), name);
                    }
                });
            if feature != state.feature {
                state.select_feature(feature);
            }
            ui.separator();

            // ---- Model family ----
            ui.strong("Model");
            egui::ComboBox::from_id_salt("family")
                .selected_text(state.family.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for family in ModelFamily::ALL {
                        ui.selectable_value(&mut state.family, family, family.name());
                    }
                });
            ui.separator();

            // ---- Evaluation view ----
            ui.strong("Model evaluation");
            egui::ComboBox::from_id_salt("view")
                .selected_text(state.view.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for view in EvaluationView::ALL {
                        ui.selectable_value(&mut state.view, view, view.label());
                    }
                });

            ui.add_space(8.0);
            let trained = state.current_evaluation().is_some();
            let label = if trained { "Retrain" } else { "Train" };
            if ui.button(format!("{label} {}", state.family.name())).clicked() {
                state.train_selected();
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – text sections
// ---------------------------------------------------------------------------

/// Description of the selected feature.
pub fn feature_section(ui: &mut Ui, state: &AppState) {
    ui.heading("About the dataset");
    ui.label("Distribution of the selected feature over all houses.");
    if let Some(text) = catalog::describe(&state.feature) {
        ui.label(RichText::new(text).italics());
    }
}

/// Bullet list describing the selected model family.
pub fn model_section(ui: &mut Ui, state: &AppState) {
    ui.heading("About the models");
    ui.label(
        "Every available learner is built from decision trees. A random forest is a \
         collection of trees, each trained independently on a random sample of the \
         training rows drawn with replacement.",
    );
    ui.label(format!("Selected model: {}", state.family.name()));
    for line in state.family.description() {
        ui.label(format!("• {line}"));
    }
}

/// Scrollable table of the first rows of the dataset.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let preview = ds.head(PREVIEW_ROWS);
    let columns = preview.columns();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(20.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&col.name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, preview.height(), |mut row| {
                    let idx = row.index();
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(col.values[idx].to_string());
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export figures…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} houses, {} columns ({})",
                ds.height(),
                ds.width(),
                state.source_label
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_preview, "Data preview")
            .clicked()
        {
            state.show_preview = !state.show_preview;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open house data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match house_price_dashboard::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.height(),
                    dataset.column_names()
                );
                state.set_dataset(dataset, path.display().to_string());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_dialog(state: &mut AppState) {
    if let Some(dir) = rfd::FileDialog::new()
        .set_title("Export figures to folder")
        .pick_folder()
    {
        state.export_figures(&dir);
    }
}
