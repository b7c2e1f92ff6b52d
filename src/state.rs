use std::collections::BTreeSet;

use crate::analysis::regression::{group_labels, summarize_group};
use crate::analysis::{CorrelationMatrix, RegressionSummary};
use crate::color::ColorMap;
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Heatmap,
    ScatterMatrix,
    Regression,
}

impl View {
    pub const ALL: [View; 3] = [View::Heatmap, View::ScatterMatrix, View::Regression];

    pub fn label(&self) -> &'static str {
        match self {
            View::Heatmap => "Heatmap",
            View::ScatterMatrix => "Scatter matrix",
            View::Regression => "Regression",
        }
    }
}

/// The full UI state, independent of rendering.  Derived values (matrix,
/// summaries) are recomputed from the source rows whenever the scope or the
/// selected columns change; nothing is cached beyond the current values.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Active central view.
    pub view: View,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Grouping column for the regression view and scatter colouring.
    pub group_column: Option<String>,

    /// Selected group in the regression dropdown; None = all groups.
    pub selected_group: Option<Value>,

    /// Regression axes.
    pub x_column: Option<String>,
    pub y_column: Option<String>,

    /// Colour per group value.
    pub color_map: Option<ColorMap>,

    /// Correlation matrix over the visible rows.
    pub matrix: Option<CorrelationMatrix>,

    /// Per-group regression summaries, in stable group order.
    pub summaries: Vec<RegressionSummary>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            view: View::Heatmap,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            group_column: None,
            selected_group: None,
            x_column: None,
            y_column: None,
            color_map: None,
            matrix: None,
            summaries: Vec::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, initialise filters and selections.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = init_filter_state(&dataset);
        self.visible_indices = (0..dataset.len()).collect();

        // Defaults: first categorical column for grouping, first two numeric
        // columns for the regression axes.
        self.group_column = dataset.categorical_columns().first().cloned();
        let numeric = dataset.numeric_columns();
        self.x_column = numeric.first().cloned();
        self.y_column = numeric.get(1).cloned();
        self.selected_group = None;

        self.dataset = Some(dataset);
        self.rebuild_color_map();
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Rebuild the colour map from the current `group_column`.
    pub fn rebuild_color_map(&mut self) {
        self.color_map = match (&self.dataset, &self.group_column) {
            (Some(ds), Some(col)) => ds
                .unique_values
                .get(col)
                .map(|vals| ColorMap::new(col, vals)),
            _ => None,
        };
    }

    /// Recompute `visible_indices` and all derived values after a change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
        self.recompute();
    }

    /// Recompute the correlation matrix and the per-group summaries from the
    /// currently visible rows.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.matrix = None;
            self.summaries.clear();
            return;
        };

        self.matrix = match CorrelationMatrix::compute(ds, &self.visible_indices) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("correlation matrix unavailable: {e}");
                None
            }
        };

        self.summaries.clear();
        if let (Some(group_col), Some(x), Some(y)) =
            (&self.group_column, &self.x_column, &self.y_column)
        {
            // Summarize each group in stable order; degenerate groups are
            // skipped rather than failing the whole view.
            let labels = match group_labels(ds, group_col) {
                Ok(labels) => labels,
                Err(e) => {
                    log::warn!("group labels unavailable: {e}");
                    Vec::new()
                }
            };
            for value in labels {
                if let Some(sel) = &self.selected_group {
                    if sel != &value {
                        continue;
                    }
                }
                match summarize_group(ds, &self.visible_indices, group_col, &value, x, y) {
                    Ok(summary) => self.summaries.push(summary),
                    Err(e) => log::warn!("skipping group '{value}': {e}"),
                }
            }
        }
    }

    /// Set the grouping column, reset the dropdown, rebuild colours.
    pub fn set_group_column(&mut self, col: String) {
        self.group_column = Some(col);
        self.selected_group = None;
        self.rebuild_color_map();
        self.recompute();
    }

    pub fn set_x_column(&mut self, col: String) {
        self.x_column = Some(col);
        self.recompute();
    }

    pub fn set_y_column(&mut self, col: String) {
        self.y_column = Some(col);
        self.recompute();
    }

    /// Select one group in the regression dropdown (None = all groups).
    pub fn set_selected_group(&mut self, value: Option<Value>) {
        self.selected_group = value;
        self.recompute();
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Value) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(ds) = &self.dataset {
            if let Some(all_vals) = ds.unique_values.get(column) {
                self.filters.insert(column.to_string(), all_vals.clone());
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }
}
