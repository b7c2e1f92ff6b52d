use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Grouped regression plot (central panel)
// ---------------------------------------------------------------------------

/// Render the visible rows of each summarized group as scatter points plus
/// the fitted line, legend entries carrying the group's correlation
/// coefficient.  Group visibility can be toggled through the legend; the
/// dropdown in the side panel narrows the plot to a single group.
pub fn regression_plot(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to fit per-group regressions  (File → Open…)");
        });
        return;
    };

    let (Some(group_col), Some(x_col), Some(y_col)) =
        (&state.group_column, &state.x_column, &state.y_column)
    else {
        ui.label("Pick a grouping column and two numeric axes in the side panel.");
        return;
    };

    if state.summaries.is_empty() {
        ui.label("No group has enough paired observations to fit a line.");
        return;
    }

    Plot::new("regression_plot")
        .legend(Legend::default())
        .x_axis_label(x_col)
        .y_axis_label(y_col)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for summary in &state.summaries {
                let label = summary.legend_label();
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&summary.group))
                    .unwrap_or(Color32::LIGHT_BLUE);

                // The group's observed points.
                let scatter: Vec<[f64; 2]> = state
                    .visible_indices
                    .iter()
                    .filter_map(|&idx| {
                        let row = &dataset.rows[idx];
                        if row.get(group_col) != Some(&summary.group) {
                            return None;
                        }
                        let x = row.numeric(x_col)?;
                        let y = row.numeric(y_col)?;
                        Some([x, y])
                    })
                    .collect();
                plot_ui.points(
                    Points::new(PlotPoints::from(scatter))
                        .name(&label)
                        .color(color)
                        .radius(2.5),
                );

                // The fitted line over the group's observed x-range.
                let line: PlotPoints = summary.line.iter().copied().collect();
                plot_ui.line(Line::new(line).name(&label).color(color).width(2.0));
            }
        });
}
