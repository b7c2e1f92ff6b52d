use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – selectors and filter widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let numeric_cols = dataset.numeric_columns();
    let categorical_cols = dataset.categorical_columns();
    let unique = dataset.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Grouping column ----
            ui.strong("Group by");
            let current_group_col = state.group_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("group_by")
                .selected_text(&current_group_col)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &categorical_cols {
                        if ui
                            .selectable_label(current_group_col == *col, col)
                            .clicked()
                        {
                            state.set_group_column(col.clone());
                        }
                    }
                });

            // ---- Regression-specific selectors ----
            if state.view == View::Regression {
                ui.add_space(4.0);
                axis_selector(ui, state, "X axis", "x_axis", &numeric_cols, true);
                axis_selector(ui, state, "Y axis", "y_axis", &numeric_cols, false);
                ui.add_space(4.0);
                group_dropdown(ui, state);
            }
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            ui.strong("Filters");
            for col in &categorical_cols {
                let Some(all_values) = unique.get(col) else {
                    continue;
                };

                let selected = state.filters.entry(col.clone()).or_default();

                // Show count of selected / total in the header
                let n_selected = selected.len();
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        // Re-borrow after potential mutation from All/None
                        let selected = state.filters.entry(col.clone()).or_default();

                        let mut changed = false;
                        for val in all_values {
                            let is_selected = selected.contains(val);
                            let label = val.to_string();

                            // Show colour swatch if this is the grouping column
                            let mut text = RichText::new(&label);
                            if state.group_column.as_deref() == Some(col) {
                                if let Some(cm) = &state.color_map {
                                    let c = cm.color_for(val);
                                    text = text.color(c);
                                }
                            }

                            let mut checked = is_selected;
                            if ui.checkbox(&mut checked, text).changed() {
                                changed = true;
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                            }
                        }
                        if changed {
                            state.refilter();
                        }
                    });
            }
        });
}

/// ComboBox for one regression axis.
fn axis_selector(
    ui: &mut Ui,
    state: &mut AppState,
    label: &str,
    id: &str,
    numeric_cols: &[String],
    is_x: bool,
) {
    ui.strong(label);
    let current = if is_x {
        state.x_column.clone()
    } else {
        state.y_column.clone()
    }
    .unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in numeric_cols {
                if ui.selectable_label(current == *col, col).clicked() {
                    if is_x {
                        state.set_x_column(col.clone());
                    } else {
                        state.set_y_column(col.clone());
                    }
                }
            }
        });
}

/// Dropdown narrowing the regression plot to one group ("All groups" shows
/// every group at once).
fn group_dropdown(ui: &mut Ui, state: &mut AppState) {
    let Some(group_col) = state.group_column.clone() else {
        return;
    };
    let Some(ds) = &state.dataset else {
        return;
    };
    let labels: Vec<_> = ds
        .unique_values
        .get(&group_col)
        .map(|vals| vals.iter().cloned().collect())
        .unwrap_or_default();

    ui.strong("Show group");
    let current_text = state
        .selected_group
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "All groups".to_string());
    egui::ComboBox::from_id_salt("show_group")
        .selected_text(current_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(state.selected_group.is_none(), "All groups")
                .clicked()
            {
                state.set_selected_group(None);
            }
            for val in labels {
                let is_selected = state.selected_group.as_ref() == Some(&val);
                if ui.selectable_label(is_selected, val.to_string()).clicked() {
                    state.set_selected_group(Some(val));
                }
            }
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
        });

        ui.separator();

        for view in View::ALL {
            if ui
                .selectable_label(state.view == view, view.label())
                .clicked()
            {
                state.view = view;
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
