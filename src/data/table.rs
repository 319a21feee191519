//! Table container and schema.

use ndarray::{Array1, Array2};

/// Schema errors raised when tables are combined.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// Two tables disagree on their feature columns.
    #[error("feature columns differ: expected {expected:?}, got {got:?}")]
    Mismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
}

/// Column roles for a [`Table`].
///
/// Every column of the input file is either a numeric feature, the numeric
/// label, or the string category used for splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Feature column names, in storage order.
    pub feature_names: Vec<String>,
    /// Name of the label column.
    pub label: String,
    /// Name of the category column.
    pub category: String,
}

impl TableSchema {
    /// Check that another schema has identical feature columns.
    pub fn check_features_match(&self, other: &TableSchema) -> Result<(), SchemaError> {
        if self.feature_names != other.feature_names {
            return Err(SchemaError::Mismatch {
                expected: self.feature_names.clone(),
                got: other.feature_names.clone(),
            });
        }
        Ok(())
    }
}

/// A raw tabular dataset.
///
/// # Storage Layout
///
/// Features are stored feature-major: `[n_features, n_rows]`. The label is a
/// separate `Array1<f32>` and the category column keeps its string values
/// (it drives partitioning, not training).
///
/// # Example
///
/// ```
/// use shiftval::{Table, TableSchema};
/// use ndarray::array;
///
/// let schema = TableSchema {
///     feature_names: vec!["x0".into(), "x1".into()],
///     label: "y".into(),
///     category: "store".into(),
/// };
/// let table = Table::new(
///     schema,
///     array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
///     array![10.0, 20.0, 30.0],
///     vec!["a".into(), "b".into(), "a".into()],
/// );
/// assert_eq!(table.n_rows(), 3);
/// assert_eq!(table.n_features(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    schema: TableSchema,
    /// Feature data `[n_features, n_rows]`.
    features: Array2<f32>,
    /// Label values, length = n_rows.
    labels: Array1<f32>,
    /// Category values, length = n_rows.
    categories: Vec<String>,
}

impl Table {
    /// Create a table from feature-major data.
    ///
    /// # Panics
    ///
    /// Debug-asserts that row counts match across features, labels, and
    /// categories, and that the schema names every feature.
    pub fn new(
        schema: TableSchema,
        features: Array2<f32>,
        labels: Array1<f32>,
        categories: Vec<String>,
    ) -> Self {
        let n_rows = features.ncols();
        debug_assert_eq!(labels.len(), n_rows, "labels must have one value per row");
        debug_assert_eq!(categories.len(), n_rows, "categories must have one value per row");
        debug_assert_eq!(
            schema.feature_names.len(),
            features.nrows(),
            "schema must name every feature"
        );
        Self {
            schema,
            features,
            labels,
            categories,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.features.ncols()
    }

    /// Number of feature columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// Get the schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Feature matrix view `[n_features, n_rows]`.
    pub fn features(&self) -> ndarray::ArrayView2<'_, f32> {
        self.features.view()
    }

    /// Label values.
    pub fn labels(&self) -> ndarray::ArrayView1<'_, f32> {
        self.labels.view()
    }

    /// Category values.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Row indices whose category equals `value`.
    pub fn rows_with_category(&self, value: &str) -> Vec<usize> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == value)
            .map(|(i, _)| i)
            .collect()
    }

    /// Select a row subset, preserving the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Table {
        let n_features = self.n_features();
        let mut features = Array2::zeros((n_features, indices.len()));
        let mut labels = Array1::zeros(indices.len());
        let mut categories = Vec::with_capacity(indices.len());
        for (out, &row) in indices.iter().enumerate() {
            for f in 0..n_features {
                features[[f, out]] = self.features[[f, row]];
            }
            labels[out] = self.labels[row];
            categories.push(self.categories[row].clone());
        }
        Table {
            schema: self.schema.clone(),
            features,
            labels,
            categories,
        }
    }
}
