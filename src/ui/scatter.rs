use eframe::egui::{self, Color32, Ui, Vec2};
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};

use crate::data::model::Dataset;
use crate::state::AppState;

/// Upper bound on grid size; beyond this the subplots get unreadably small.
const MAX_VARS: usize = 6;
const BINS: usize = 10;

// ---------------------------------------------------------------------------
// Scatter matrix (central panel)
// ---------------------------------------------------------------------------

/// Render a grid of pairwise scatter plots over the visible rows, one
/// histogram per variable on the diagonal.  Points are coloured by the
/// grouping column when one is selected.
pub fn scatter_matrix(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the scatter matrix  (File → Open…)");
        });
        return;
    };

    let mut vars = dataset.numeric_columns();
    if vars.len() > MAX_VARS {
        log::debug!("scatter matrix limited to first {MAX_VARS} of {} columns", vars.len());
        vars.truncate(MAX_VARS);
    }
    if vars.is_empty() {
        ui.label("No numeric columns in this dataset.");
        return;
    }

    let n = vars.len();
    let spacing = ui.spacing().item_spacing;
    let size = ((ui.available_width() - spacing.x * n as f32) / n as f32)
        .min((ui.available_height() - spacing.y * n as f32) / n as f32)
        .max(40.0);

    egui::Grid::new("scatter_matrix").show(ui, |ui: &mut Ui| {
        for (row_idx, y_var) in vars.iter().enumerate() {
            for (col_idx, x_var) in vars.iter().enumerate() {
                ui.allocate_ui(Vec2::splat(size), |ui: &mut Ui| {
                    if row_idx == col_idx {
                        histogram_cell(ui, state, dataset, x_var, size);
                    } else {
                        scatter_cell(ui, state, dataset, x_var, y_var, size);
                    }
                });
            }
            ui.end_row();
        }
    });
}

/// One off-diagonal cell: y_var against x_var.
fn scatter_cell(
    ui: &mut Ui,
    state: &AppState,
    dataset: &Dataset,
    x_var: &str,
    y_var: &str,
    size: f32,
) {
    Plot::new(format!("scatter_{x_var}_{y_var}"))
        .width(size)
        .height(size)
        .show_axes([false, false])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            // One Points series per group so each gets its own colour.
            let group_col = state.group_column.as_deref();
            let mut series: Vec<(Color32, Vec<[f64; 2]>)> = Vec::new();

            for &idx in &state.visible_indices {
                let row = &dataset.rows[idx];
                let (Some(x), Some(y)) = (row.numeric(x_var), row.numeric(y_var)) else {
                    continue;
                };
                let color = group_col
                    .and_then(|col| {
                        let val = row.get(col)?;
                        let cm = state.color_map.as_ref()?;
                        Some(cm.color_for(val))
                    })
                    .unwrap_or(Color32::LIGHT_BLUE);

                match series.iter_mut().find(|(c, _)| *c == color) {
                    Some((_, pts)) => pts.push([x, y]),
                    None => series.push((color, vec![[x, y]])),
                }
            }

            for (color, pts) in series {
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .radius(1.5)
                        .color(color),
                );
            }
        });
}

/// One diagonal cell: distribution of a single variable.
fn histogram_cell(
    ui: &mut Ui,
    state: &AppState,
    dataset: &Dataset,
    var: &str,
    size: f32,
) {
    let values: Vec<f64> = state
        .visible_indices
        .iter()
        .filter_map(|&idx| dataset.rows[idx].numeric(var))
        .filter(|v| v.is_finite())
        .collect();

    Plot::new(format!("hist_{var}"))
        .width(size)
        .height(size)
        .show_axes([false, false])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let Some(bars) = histogram_bars(&values) else {
                return;
            };
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::GRAY).name(var));
        });
}

/// Bin values into [`BINS`] equal-width bars; `None` for degenerate input.
fn histogram_bars(values: &[f64]) -> Option<Vec<Bar>> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / BINS as f64;
    if width <= 0.0 {
        return None;
    }

    let mut counts = [0usize; BINS];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(BINS - 1);
        counts[bin] += 1;
    }

    Some(
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Bar::new(min + (i as f64 + 0.5) * width, count as f64).width(width * 0.95)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bars = histogram_bars(&values).unwrap();
        assert_eq!(bars.len(), BINS);
        let total: f64 = bars.iter().map(|b| b.value).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn histogram_of_constant_values_is_degenerate() {
        assert!(histogram_bars(&[5.0, 5.0, 5.0]).is_none());
        assert!(histogram_bars(&[]).is_none());
    }
}
