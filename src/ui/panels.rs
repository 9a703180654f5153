use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – data editor and plot controls
// ---------------------------------------------------------------------------

/// Render the data editor, reference selector, and plot controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data");
    ui.separator();

    let mut changed = false;
    let mut remove_index: Option<usize> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Editable measurement table ----
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::remainder().at_least(90.0))
                .column(Column::auto().at_least(64.0))
                .column(Column::auto().at_least(64.0))
                .column(Column::auto())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Label");
                    });
                    header.col(|ui| {
                        ui.strong("Estimate");
                    });
                    header.col(|ui| {
                        ui.strong("SE");
                    });
                    header.col(|_ui| {});
                })
                .body(|mut body| {
                    for (index, measurement) in state.rows.iter_mut().enumerate() {
                        body.row(22.0, |mut row| {
                            row.col(|ui| {
                                changed |= ui
                                    .text_edit_singleline(&mut measurement.label)
                                    .changed();
                            });
                            row.col(|ui| {
                                changed |= ui
                                    .add(
                                        egui::DragValue::new(&mut measurement.estimate)
                                            .speed(0.1),
                                    )
                                    .changed();
                            });
                            row.col(|ui| {
                                // The widget keeps SE non-negative; the stats
                                // layer still rejects anything that slips past.
                                changed |= ui
                                    .add(
                                        egui::DragValue::new(&mut measurement.se)
                                            .speed(0.1)
                                            .range(0.0..=f64::INFINITY),
                                    )
                                    .changed();
                            });
                            row.col(|ui| {
                                if ui.small_button("✕").clicked() {
                                    remove_index = Some(index);
                                }
                            });
                        });
                    }
                });

            if ui.button("Add row").clicked() {
                state.add_row();
            }
            ui.separator();

            // ---- Reference selector ----
            ui.strong("Select reference");
            let labels = state.labels();
            egui::ComboBox::from_id_salt("reference")
                .selected_text(&state.reference)
                .show_ui(ui, |ui: &mut Ui| {
                    for label in &labels {
                        if ui
                            .selectable_label(state.reference == *label, label)
                            .clicked()
                        {
                            state.set_reference(label.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Interval multiplier ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong("CI multiplier (z)");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut state.z)
                            .speed(0.01)
                            .range(0.0..=100.0),
                    )
                    .changed();
            });
            ui.label("1.96 gives a 95% two-sided normal interval.");
            ui.separator();

            // ---- Titles (display-only) ----
            ui.strong("Chart title");
            ui.text_edit_singleline(&mut state.chart_title);
            ui.strong("X axis title");
            ui.text_edit_singleline(&mut state.x_axis_title);
            ui.strong("Y axis title");
            ui.text_edit_singleline(&mut state.y_axis_title);
        });

    if let Some(index) = remove_index {
        state.remove_row(index);
    } else if changed {
        state.recompute();
    }
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

            let export_ready = matches!(&state.comparison, Ok(rows) if !rows.is_empty());
            if ui
                .add_enabled(export_ready, egui::Button::new("Export comparison CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let compared = state
            .comparison
            .as_ref()
            .map(|rows| rows.len())
            .unwrap_or(0);
        ui.label(format!("{} rows, {} compared", state.rows.len(), compared));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measurement table")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(rows) => {
                log::info!("Loaded {} measurements from {}", rows.len(), path.display());
                state.set_rows(rows);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let rows = match &state.comparison {
        Ok(rows) if !rows.is_empty() => rows.clone(),
        _ => return,
    };

    let file = rfd::FileDialog::new()
        .set_title("Export comparison table")
        .set_file_name("comparison.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::write_comparison_csv(&path, &rows) {
            Ok(()) => {
                log::info!(
                    "Exported {} comparison rows to {}",
                    rows.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
