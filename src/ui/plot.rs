use std::ops::RangeInclusive;

use eframe::egui::{Color32, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints, Points, VLine};

use crate::state::AppState;
use crate::stats::ComparisonRow;

// ---------------------------------------------------------------------------
// Central panel: the two forest plots and the comparison table
// ---------------------------------------------------------------------------

/// One mark on a forest plot: a point with its interval whisker.
struct IntervalMark {
    label: String,
    center: f64,
    low: f64,
    high: f64,
}

/// Render both plots and the comparison table.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Primary plot: estimates with confidence intervals ----
            ui.heading(&state.chart_title);
            match &state.intervals {
                Ok(rows) if rows.is_empty() => {
                    ui.label("Add rows to see the forest plot.");
                }
                Ok(rows) => {
                    let marks: Vec<IntervalMark> = rows
                        .iter()
                        .map(|r| IntervalMark {
                            label: r.label.clone(),
                            center: r.estimate,
                            low: r.low,
                            high: r.high,
                        })
                        .collect();
                    forest_plot(ui, state, "forest_plot", "Null", &marks);
                }
                Err(e) => {
                    ui.colored_label(Color32::RED, e.to_string());
                }
            }

            ui.separator();

            // ---- Secondary plot: differences from the reference ----
            ui.heading(format!("Comparison to reference ({})", state.reference));
            match &state.comparison {
                Ok(rows) if rows.is_empty() => {
                    ui.label("No rows to compare against the reference.");
                }
                Ok(rows) => {
                    let marks: Vec<IntervalMark> = rows
                        .iter()
                        .map(|r| IntervalMark {
                            label: r.label.clone(),
                            center: r.diff,
                            low: r.low,
                            high: r.high,
                        })
                        .collect();
                    forest_plot(ui, state, "comparison_plot", "Reference", &marks);
                    comparison_table(ui, rows);
                }
                Err(e) => {
                    ui.colored_label(Color32::RED, e.to_string());
                    ui.label("Select a reference that matches a row in the table.");
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Forest plot rendering
// ---------------------------------------------------------------------------

/// Draw one forest plot: a vertical marker line at zero plus, per row, a
/// horizontal interval whisker and a filled point. Rows are stacked top-down
/// in input order.
fn forest_plot(
    ui: &mut Ui,
    state: &AppState,
    id: &str,
    marker_label: &str,
    marks: &[IntervalMark],
) {
    let n = marks.len();
    let labels: Vec<String> = marks.iter().map(|m| m.label.clone()).collect();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(&state.x_axis_title)
        .y_axis_label(&state.y_axis_title)
        .height(280.0)
        .include_x(0.0)
        .include_y(-0.5)
        .include_y(n as f64 - 0.5)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            // Only whole-number gridlines carry a row label.
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 {
                return String::new();
            }
            let index = rounded as i64;
            if index < 0 || index >= labels.len() as i64 {
                return String::new();
            }
            labels[labels.len() - 1 - index as usize].clone()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.vline(VLine::new(0.0).color(Color32::BLACK).name(marker_label));

            for (i, mark) in marks.iter().enumerate() {
                let y = (n - 1 - i) as f64;
                let color = state.color_map.color_for(&mark.label);

                let whisker: PlotPoints = vec![[mark.low, y], [mark.high, y]].into();
                plot_ui.line(Line::new(whisker).color(color).width(2.0).name(&mark.label));

                let point: PlotPoints = vec![[mark.center, y]].into();
                plot_ui.points(
                    Points::new(point)
                        .color(color)
                        .radius(4.0)
                        .filled(true)
                        .name(&mark.label),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

/// Tabular view of the comparison rows, mirroring the CSV export columns.
fn comparison_table(ui: &mut Ui, rows: &[ComparisonRow]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(90.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Label");
            });
            header.col(|ui| {
                ui.strong("diff");
            });
            header.col(|ui| {
                ui.strong("diff_SE");
            });
            header.col(|ui| {
                ui.strong("low_CI");
            });
            header.col(|ui| {
                ui.strong("high_CI");
            });
        })
        .body(|mut body| {
            for row in rows {
                body.row(20.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.label);
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.4}", row.diff));
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.4}", row.diff_se));
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.4}", row.low));
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.4}", row.high));
                    });
                });
            }
        });
}
