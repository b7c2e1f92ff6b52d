use crate::data::model::Dataset;

use super::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns `Ok(None)` when either sample has zero variance: the coefficient
/// is then undefined, and we signal that with a typed value rather than
/// letting a NaN propagate silently.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Option<f64>> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(AnalysisError::InsufficientData { needed: 2, got: n });
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Ok(None);
    }

    // Clamp against floating-point drift just outside [-1, 1].
    Ok(Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)))
}

// ---------------------------------------------------------------------------
// CorrelationMatrix – pairwise Pearson r over the numeric columns
// ---------------------------------------------------------------------------

/// One entry of the long-format `(var_a, var_b, value)` table.  Covers the
/// upper triangle including the diagonal, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct LongEntry {
    pub var_a: String,
    pub var_b: String,
    pub value: Option<f64>,
}

/// Symmetric matrix of pairwise Pearson coefficients across the numeric
/// columns of a dataset.  A cell is `None` when the pair is undefined:
/// fewer than 2 pairwise-complete observations, or zero variance on either
/// side.  The diagonal is `Some(1.0)` for any column with variance.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    variables: Vec<String>,
    /// Row-major `n × n` cells.
    cells: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    /// Compute the matrix over the given row indices of the dataset.
    ///
    /// Cells are computed over pairwise-complete observations: a row
    /// contributes to `corr(a, b)` only when both cells are present and
    /// finite.  Fails when fewer than 2 rows are in scope or the dataset has
    /// no numeric column.
    pub fn compute(dataset: &Dataset, indices: &[usize]) -> Result<Self> {
        let variables = dataset.numeric_columns();
        if variables.is_empty() {
            return Err(AnalysisError::InsufficientData { needed: 2, got: 0 });
        }
        if indices.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                needed: 2,
                got: indices.len(),
            });
        }

        // Materialise each numeric column once.
        let columns: Vec<Vec<Option<f64>>> = variables
            .iter()
            .map(|col| {
                indices
                    .iter()
                    .map(|&i| dataset.rows[i].numeric(col).filter(|v| v.is_finite()))
                    .collect()
            })
            .collect();

        let n = variables.len();
        let mut cells = vec![None; n * n];
        for i in 0..n {
            for j in i..n {
                let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                    .iter()
                    .zip(columns[j].iter())
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .unzip();

                let value = if xs.len() < 2 {
                    None
                } else if i == j {
                    // Exact 1.0 on the diagonal, undefined for constant columns
                    pearson(&xs, &ys)?.map(|_| 1.0)
                } else {
                    pearson(&xs, &ys)?
                };
                cells[i * n + j] = value;
                cells[j * n + i] = value;
            }
        }

        Ok(CorrelationMatrix { variables, cells })
    }

    /// Compute over every row of the dataset.
    pub fn compute_all(dataset: &Dataset) -> Result<Self> {
        let indices: Vec<usize> = (0..dataset.len()).collect();
        Self::compute(dataset, &indices)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Cell by position; `None` when the pair is undefined.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells[i * self.variables.len() + j]
    }

    /// Cell by variable names.
    pub fn value(&self, a: &str, b: &str) -> Result<Option<f64>> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.get(i, j))
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.variables
            .iter()
            .position(|v| v == name)
            .ok_or_else(|| AnalysisError::UnknownColumn(name.to_string()))
    }

    /// Cell text rounded to 2 decimals, `"–"` when undefined.
    pub fn display_value(&self, i: usize, j: usize) -> String {
        match self.get(i, j) {
            Some(r) => format!("{r:.2}"),
            None => "–".to_string(),
        }
    }

    /// Hover text for one cell, e.g. `corr(sepal_length, petal_width) = 0.82`.
    pub fn hover_text(&self, i: usize, j: usize) -> String {
        format!(
            "corr({}, {}) = {}",
            self.variables[i],
            self.variables[j],
            self.display_value(i, j)
        )
    }

    /// Long-format view: one entry per upper-triangle pair, diagonal
    /// included, row-major.
    pub fn to_long(&self) -> Vec<LongEntry> {
        let n = self.variables.len();
        let mut entries = Vec::with_capacity(n * (n + 1) / 2);
        for i in 0..n {
            for j in i..n {
                entries.push(LongEntry {
                    var_a: self.variables[i].clone(),
                    var_b: self.variables[j].clone(),
                    value: self.get(i, j),
                });
            }
        }
        entries
    }

    /// Rebuild a matrix from a long-format table.  Entries may arrive in any
    /// order and in either (a, b) orientation; pairs not mentioned stay
    /// undefined.  Fails on names outside `variables`.
    pub fn from_long(variables: Vec<String>, entries: &[LongEntry]) -> Result<Self> {
        let n = variables.len();
        let mut matrix = CorrelationMatrix {
            variables,
            cells: vec![None; n * n],
        };
        for entry in entries {
            let i = matrix.index_of(&entry.var_a)?;
            let j = matrix.index_of(&entry.var_b)?;
            matrix.cells[i * n + j] = entry.value;
            matrix.cells[j * n + i] = entry.value;
        }
        Ok(matrix)
    }

    /// The `k` strongest off-diagonal pairs by |r|, strongest first.
    /// Undefined cells are skipped.
    pub fn strongest_pairs(&self, k: usize) -> Vec<(String, String, f64)> {
        let n = self.variables.len();
        let mut pairs: Vec<(String, String, f64)> = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(r) = self.get(i, j) {
                    pairs.push((self.variables[i].clone(), self.variables[j].clone(), r));
                }
            }
        }
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs.truncate(k);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Row, Value};

    fn dataset(rows: &[(&str, f64, f64, f64)]) -> Dataset {
        let rows: Vec<Row> = rows
            .iter()
            .map(|(g, a, b, c)| {
                [
                    ("group".to_string(), Value::String(g.to_string())),
                    ("a".to_string(), Value::Float(*a)),
                    ("b".to_string(), Value::Float(*b)),
                    ("c".to_string(), Value::Float(*c)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        Dataset::from_rows(
            vec!["group".into(), "a".into(), "b".into(), "c".into()],
            rows,
        )
    }

    #[test]
    fn pearson_matches_reference_formula() {
        // Hand-computed: x = [1,2,3,4], y = [2,1,4,3] → r = 0.6
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 1.0, 4.0, 3.0])
            .unwrap()
            .unwrap();
        assert!((r - 0.6).abs() < 1e-6);
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let x = [1.0, 2.0, 3.0];
        let up = pearson(&x, &[2.0, 4.0, 6.0]).unwrap().unwrap();
        let down = pearson(&x, &[6.0, 4.0, 2.0]).unwrap().unwrap();
        assert!((up - 1.0).abs() < 1e-12);
        assert!((down + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_zero_variance_is_undefined() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap(), None);
    }

    #[test]
    fn pearson_too_few_samples() {
        assert_eq!(
            pearson(&[1.0], &[2.0]).unwrap_err(),
            AnalysisError::InsufficientData { needed: 2, got: 1 }
        );
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let ds = dataset(&[
            ("x", 1.0, 5.0, 2.1),
            ("x", 2.0, 4.0, 3.9),
            ("y", 3.0, 6.0, 6.2),
            ("y", 4.0, 2.0, 7.8),
            ("y", 5.0, 3.0, 10.1),
        ]);
        let m = CorrelationMatrix::compute_all(&ds).unwrap();

        assert_eq!(m.variables(), &["a".to_string(), "b".to_string(), "c".to_string()]);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
                if let Some(r) = m.get(i, j) {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn constant_column_has_undefined_cells() {
        let ds = dataset(&[
            ("x", 1.0, 7.0, 1.0),
            ("x", 2.0, 7.0, 2.0),
            ("x", 3.0, 7.0, 3.0),
        ]);
        let m = CorrelationMatrix::compute_all(&ds).unwrap();
        let b = m.variables().iter().position(|v| v == "b").unwrap();

        // Zero-variance column: undefined against everything, itself included
        assert_eq!(m.get(b, b), None);
        for j in 0..m.len() {
            if j != b {
                assert_eq!(m.get(b, j), None);
            }
        }
        assert_eq!(m.display_value(b, b), "–");
    }

    #[test]
    fn missing_cells_use_pairwise_complete_rows() {
        let rows: Vec<Row> = vec![
            [
                ("a".to_string(), Value::Float(1.0)),
                ("b".to_string(), Value::Float(2.0)),
            ]
            .into_iter()
            .collect(),
            [
                ("a".to_string(), Value::Null),
                ("b".to_string(), Value::Float(3.0)),
            ]
            .into_iter()
            .collect(),
            [
                ("a".to_string(), Value::Float(3.0)),
                ("b".to_string(), Value::Float(6.0)),
            ]
            .into_iter()
            .collect(),
        ];
        let ds = Dataset::from_rows(vec!["a".into(), "b".into()], rows);
        let m = CorrelationMatrix::compute_all(&ds).unwrap();
        // Only rows 0 and 2 pair up: (1,2) and (3,6) → perfectly correlated
        let r = m.value("a", "b").unwrap().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_rows_fails() {
        let ds = dataset(&[("x", 1.0, 2.0, 3.0)]);
        assert_eq!(
            CorrelationMatrix::compute_all(&ds).unwrap_err(),
            AnalysisError::InsufficientData { needed: 2, got: 1 }
        );
    }

    #[test]
    fn long_format_round_trip() {
        let ds = dataset(&[
            ("x", 1.0, 5.0, 2.0),
            ("x", 2.0, 3.0, 4.0),
            ("x", 3.0, 4.0, 7.0),
            ("x", 4.0, 1.0, 9.0),
        ]);
        let m = CorrelationMatrix::compute_all(&ds).unwrap();
        let long = m.to_long();
        // n=3 numeric columns → 6 upper-triangle entries incl. diagonal
        assert_eq!(long.len(), 6);

        let rebuilt = CorrelationMatrix::from_long(m.variables().to_vec(), &long).unwrap();
        assert_eq!(rebuilt, m);
    }

    #[test]
    fn from_long_rejects_unknown_variable() {
        let entries = vec![LongEntry {
            var_a: "a".into(),
            var_b: "nope".into(),
            value: Some(0.5),
        }];
        assert_eq!(
            CorrelationMatrix::from_long(vec!["a".into()], &entries).unwrap_err(),
            AnalysisError::UnknownColumn("nope".to_string())
        );
    }

    #[test]
    fn strongest_pairs_sorted_by_magnitude() {
        let ds = dataset(&[
            ("x", 1.0, 9.0, 1.2),
            ("x", 2.0, 7.5, 1.9),
            ("x", 3.0, 6.1, 3.4),
            ("x", 4.0, 4.0, 3.8),
        ]);
        let m = CorrelationMatrix::compute_all(&ds).unwrap();
        let pairs = m.strongest_pairs(2);
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].2.abs() >= pairs[1].2.abs());
    }
}
