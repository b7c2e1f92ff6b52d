use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common DataFrame dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for numeric analysis.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – numeric vs categorical, decided per column
// ---------------------------------------------------------------------------

/// How a column is treated by the analysis layer.  A column is numeric when
/// every non-null cell is an integer or float; anything else (strings, bools,
/// mixed) is categorical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

// ---------------------------------------------------------------------------
// Row – one record of the table
// ---------------------------------------------------------------------------

/// A single row: column name → cell value.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub values: BTreeMap<String, Value>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// The cell as `f64`, `None` when missing or non-numeric.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(Value::as_f64)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Row {
            values: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, in source order.
    pub rows: Vec<Row>,
    /// Column names in source (header) order.
    pub column_names: Vec<String>,
    /// Per-column kind.
    pub kinds: BTreeMap<String, ColumnKind>,
    /// For each categorical column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Dataset {
    /// Build column indices from loaded rows.  `column_names` preserves the
    /// source header order; columns only seen in rows are appended sorted.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let mut column_names = column_names;
        let known: BTreeSet<String> = column_names.iter().cloned().collect();
        let extra: BTreeSet<String> = rows
            .iter()
            .flat_map(|r| r.values.keys())
            .filter(|c| !known.contains(*c))
            .cloned()
            .collect();
        column_names.extend(extra);

        let mut kinds: BTreeMap<String, ColumnKind> = BTreeMap::new();
        for col in &column_names {
            let numeric = rows
                .iter()
                .filter_map(|r| r.get(col))
                .filter(|v| !v.is_null())
                .all(|v| matches!(v, Value::Integer(_) | Value::Float(_)));
            let kind = if numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            };
            kinds.insert(col.clone(), kind);
        }

        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = BTreeMap::new();
        for row in &rows {
            for (col, val) in &row.values {
                if kinds.get(col) == Some(&ColumnKind::Categorical) {
                    unique_values
                        .entry(col.clone())
                        .or_default()
                        .insert(val.clone());
                }
            }
        }

        Dataset {
            rows,
            column_names,
            kinds,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.kinds.get(column).copied()
    }

    /// Column names of numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_names
            .iter()
            .filter(|c| self.kind(c) == Some(ColumnKind::Numeric))
            .cloned()
            .collect()
    }

    /// Column names of categorical columns, in header order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.column_names
            .iter()
            .filter(|c| self.kind(c) == Some(ColumnKind::Categorical))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn column_kind_inference() {
        let ds = Dataset::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                row(&[
                    ("a", Value::Float(1.0)),
                    ("b", Value::String("x".into())),
                    ("c", Value::Integer(3)),
                ]),
                row(&[
                    ("a", Value::Integer(2)),
                    ("b", Value::String("y".into())),
                    ("c", Value::Null),
                ]),
            ],
        );
        assert_eq!(ds.kind("a"), Some(ColumnKind::Numeric));
        assert_eq!(ds.kind("b"), Some(ColumnKind::Categorical));
        // Nulls don't demote a numeric column
        assert_eq!(ds.kind("c"), Some(ColumnKind::Numeric));
        assert_eq!(ds.numeric_columns(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(ds.categorical_columns(), vec!["b".to_string()]);
    }

    #[test]
    fn unique_values_only_for_categorical() {
        let ds = Dataset::from_rows(
            vec!["species".into(), "width".into()],
            vec![
                row(&[
                    ("species", Value::String("setosa".into())),
                    ("width", Value::Float(3.5)),
                ]),
                row(&[
                    ("species", Value::String("virginica".into())),
                    ("width", Value::Float(3.1)),
                ]),
                row(&[
                    ("species", Value::String("setosa".into())),
                    ("width", Value::Float(3.2)),
                ]),
            ],
        );
        let species = ds.unique_values.get("species").unwrap();
        assert_eq!(species.len(), 2);
        assert!(!ds.unique_values.contains_key("width"));
    }

    #[test]
    fn numeric_cell_access() {
        let r = row(&[("x", Value::Integer(4)), ("g", Value::String("a".into()))]);
        assert_eq!(r.numeric("x"), Some(4.0));
        assert_eq!(r.numeric("g"), None);
        assert_eq!(r.numeric("missing"), None);
    }

    #[test]
    fn value_ordering_is_stable() {
        let mut set = BTreeSet::new();
        set.insert(Value::String("b".into()));
        set.insert(Value::String("a".into()));
        set.insert(Value::Null);
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                Value::Null,
                Value::String("a".into()),
                Value::String("b".into())
            ]
        );
    }
}
