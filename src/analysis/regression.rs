use crate::data::model::{ColumnKind, Dataset, Value};

use super::correlation::pearson;
use super::error::{AnalysisError, Result};

/// Number of evenly spaced points sampled along a fitted line.
pub const LINE_SAMPLES: usize = 100;

// ---------------------------------------------------------------------------
// Ordinary least-squares line
// ---------------------------------------------------------------------------

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit of `y` on `x`.
///
/// Fails when fewer than 2 observations exist or `x` has zero variance
/// (no line slope can be estimated from a degenerate domain).
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(AnalysisError::InsufficientData { needed: 2, got: n });
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        cov += dx * (y[i] - mean_y);
        var_x += dx * dx;
    }

    if var_x == 0.0 {
        return Err(AnalysisError::InsufficientData { needed: 2, got: n });
    }

    let slope = cov / var_x;
    Ok(LineFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

// ---------------------------------------------------------------------------
// Per-group regression summary
// ---------------------------------------------------------------------------

/// Regression line and correlation for one group of rows: the fitted line
/// sampled over the group's observed x-range plus the Pearson coefficient of
/// (x, y) within the group.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionSummary {
    /// The grouping value this summary describes.
    pub group: Value,
    /// Fitted slope and intercept.
    pub fit: LineFit,
    /// [`LINE_SAMPLES`] points spanning exactly [min(x), max(x)] of the group.
    pub line: Vec<[f64; 2]>,
    /// Pearson r of (x, y) within the group.
    pub r: f64,
}

impl RegressionSummary {
    /// Legend text, e.g. `setosa (r = 0.86)`.
    pub fn legend_label(&self) -> String {
        format!("{} (r = {:.2})", self.group, self.r)
    }
}

/// Sorted unique values of the grouping column – the stable option ordering
/// used for dropdowns and legends.
pub fn group_labels(dataset: &Dataset, column: &str) -> Result<Vec<Value>> {
    if !dataset.column_names.iter().any(|c| c == column) {
        return Err(AnalysisError::UnknownColumn(column.to_string()));
    }
    if let Some(vals) = dataset.unique_values.get(column) {
        return Ok(vals.iter().cloned().collect());
    }
    // Numeric grouping column: derive the sorted distinct values directly.
    let mut vals: Vec<Value> = dataset
        .rows
        .iter()
        .filter_map(|r| r.get(column))
        .cloned()
        .collect();
    vals.sort();
    vals.dedup();
    Ok(vals)
}

/// Summarize one group: filter the in-scope rows to `group_col == group_value`,
/// fit a least-squares line of `y_col` on `x_col`, sample it over the group's
/// observed x-range, and compute the group's Pearson coefficient.
///
/// Pure function of its inputs; derived values are recomputed fully on each
/// call.
pub fn summarize_group(
    dataset: &Dataset,
    indices: &[usize],
    group_col: &str,
    group_value: &Value,
    x_col: &str,
    y_col: &str,
) -> Result<RegressionSummary> {
    for col in [group_col, x_col, y_col] {
        if !dataset.column_names.iter().any(|c| c == col) {
            return Err(AnalysisError::UnknownColumn(col.to_string()));
        }
    }
    for col in [x_col, y_col] {
        if dataset.kind(col) != Some(ColumnKind::Numeric) {
            return Err(AnalysisError::NotNumeric(col.to_string()));
        }
    }

    let group_rows: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| dataset.rows[i].get(group_col) == Some(group_value))
        .collect();
    if group_rows.is_empty() {
        return Err(AnalysisError::UnknownGroup {
            column: group_col.to_string(),
            value: group_value.to_string(),
        });
    }

    // Non-missing finite pairs only.
    let (xs, ys): (Vec<f64>, Vec<f64>) = group_rows
        .iter()
        .filter_map(|&i| {
            let row = &dataset.rows[i];
            let x = row.numeric(x_col).filter(|v| v.is_finite())?;
            let y = row.numeric(y_col).filter(|v| v.is_finite())?;
            Some((x, y))
        })
        .unzip();
    if xs.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            got: xs.len(),
        });
    }

    let fit = fit_line(&xs, &ys)?;
    let r = pearson(&xs, &ys)?.ok_or(AnalysisError::InsufficientData {
        needed: 2,
        got: xs.len(),
    })?;

    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (LINE_SAMPLES - 1) as f64;
    let line: Vec<[f64; 2]> = (0..LINE_SAMPLES)
        .map(|i| {
            // Pin the final sample to max so the line spans exactly the
            // observed domain despite rounding in the step.
            let x = if i == LINE_SAMPLES - 1 {
                max
            } else {
                min + step * i as f64
            };
            [x, fit.eval(x)]
        })
        .collect();

    Ok(RegressionSummary {
        group: group_value.clone(),
        fit,
        line,
        r,
    })
}

/// Summarize every group of `group_col` in stable (sorted) order.  The first
/// degenerate group fails the whole call; callers that want to skip bad
/// groups iterate [`group_labels`] themselves.
pub fn summarize_groups(
    dataset: &Dataset,
    indices: &[usize],
    group_col: &str,
    x_col: &str,
    y_col: &str,
) -> Result<Vec<RegressionSummary>> {
    group_labels(dataset, group_col)?
        .iter()
        .map(|value| summarize_group(dataset, indices, group_col, value, x_col, y_col))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn dataset(rows: &[(f64, f64, &str)]) -> Dataset {
        let rows: Vec<Row> = rows
            .iter()
            .map(|(x, y, g)| {
                [
                    ("x".to_string(), Value::Float(*x)),
                    ("y".to_string(), Value::Float(*y)),
                    ("g".to_string(), Value::String(g.to_string())),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        Dataset::from_rows(vec!["x".into(), "y".into(), "g".into()], rows)
    }

    fn all(ds: &Dataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn perfectly_linear_group() {
        // y = 2x exactly
        let ds = dataset(&[(1.0, 2.0, "a"), (2.0, 4.0, "a"), (3.0, 6.0, "a")]);
        let s = summarize_group(
            &ds,
            &all(&ds),
            "g",
            &Value::String("a".into()),
            "x",
            "y",
        )
        .unwrap();

        assert!((s.r - 1.0).abs() < 1e-6);
        assert_eq!(s.line.len(), LINE_SAMPLES);
        // Domain spans exactly the observed min..max
        assert_eq!(s.line[0][0], 1.0);
        assert_eq!(s.line[LINE_SAMPLES - 1][0], 3.0);
        for [x, y] in &s.line {
            assert!((y - 2.0 * x).abs() < 1e-9);
        }
        assert_eq!(s.legend_label(), "a (r = 1.00)");
    }

    #[test]
    fn unknown_group_fails() {
        let ds = dataset(&[(1.0, 2.0, "a"), (2.0, 4.0, "a")]);
        let err = summarize_group(
            &ds,
            &all(&ds),
            "g",
            &Value::String("z".into()),
            "x",
            "y",
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnknownGroup {
                column: "g".to_string(),
                value: "z".to_string(),
            }
        );
    }

    #[test]
    fn single_row_group_is_insufficient() {
        let ds = dataset(&[(1.0, 2.0, "a"), (2.0, 4.0, "b"), (3.0, 5.0, "b")]);
        let err = summarize_group(
            &ds,
            &all(&ds),
            "g",
            &Value::String("a".into()),
            "x",
            "y",
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { needed: 2, got: 1 });
    }

    #[test]
    fn constant_y_group_is_insufficient() {
        let ds = dataset(&[(1.0, 5.0, "a"), (2.0, 5.0, "a"), (3.0, 5.0, "a")]);
        let err = summarize_group(
            &ds,
            &all(&ds),
            "g",
            &Value::String("a".into()),
            "x",
            "y",
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn non_numeric_axis_fails() {
        let ds = dataset(&[(1.0, 2.0, "a"), (2.0, 4.0, "a")]);
        let err = summarize_group(
            &ds,
            &all(&ds),
            "g",
            &Value::String("a".into()),
            "g",
            "y",
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::NotNumeric("g".to_string()));
    }

    #[test]
    fn coefficient_stays_in_range() {
        let ds = dataset(&[
            (1.0, 3.7, "a"),
            (2.0, 1.2, "a"),
            (3.0, 8.9, "a"),
            (4.0, 2.4, "a"),
            (5.0, 6.1, "a"),
        ]);
        let s = summarize_group(
            &ds,
            &all(&ds),
            "g",
            &Value::String("a".into()),
            "x",
            "y",
        )
        .unwrap();
        assert!((-1.0..=1.0).contains(&s.r));
    }

    #[test]
    fn fit_line_recovers_slope_and_intercept() {
        // y = 3x - 1 with no noise
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [-1.0, 2.0, 5.0, 8.0];
        let fit = fit_line(&x, &y).unwrap();
        assert!((fit.slope - 3.0).abs() < 1e-12);
        assert!((fit.intercept + 1.0).abs() < 1e-12);
    }

    #[test]
    fn group_labels_are_sorted_and_stable() {
        let ds = dataset(&[(1.0, 1.0, "c"), (2.0, 2.0, "a"), (3.0, 3.0, "b")]);
        let labels = group_labels(&ds, "g").unwrap();
        assert_eq!(
            labels,
            vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("c".into())
            ]
        );
        assert_eq!(
            group_labels(&ds, "nope").unwrap_err(),
            AnalysisError::UnknownColumn("nope".to_string())
        );
    }

    #[test]
    fn summarize_groups_covers_every_label_in_order() {
        let ds = dataset(&[
            (1.0, 2.0, "b"),
            (2.0, 4.1, "b"),
            (3.0, 5.9, "b"),
            (1.0, 9.0, "a"),
            (2.0, 7.2, "a"),
            (3.0, 5.1, "a"),
        ]);
        let summaries = summarize_groups(&ds, &all(&ds), "g", "x", "y").unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].group, Value::String("a".into()));
        assert_eq!(summaries[1].group, Value::String("b".into()));
        assert!(summaries[0].r < 0.0);
        assert!(summaries[1].r > 0.0);
    }

    #[test]
    fn filtered_scope_restricts_the_fit() {
        let ds = dataset(&[
            (1.0, 2.0, "a"),
            (2.0, 4.0, "a"),
            // Out-of-scope outlier that would ruin the fit
            (3.0, -50.0, "a"),
        ]);
        let s = summarize_group(
            &ds,
            &[0, 1],
            "g",
            &Value::String("a".into()),
            "x",
            "y",
        )
        .unwrap();
        assert!((s.r - 1.0).abs() < 1e-9);
        assert_eq!(s.line[LINE_SAMPLES - 1][0], 2.0);
    }
}
