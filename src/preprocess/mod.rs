//! Feature normalization fit on the source partition.
//!
//! The scaler's per-feature parameters are computed exactly once, from the
//! source partition, and then frozen. Validation and target features are
//! transformed with the same parameters. This is the domain-adaptation
//! benchmark convention: the target distribution must not leak into the
//! transform.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::data::{DataSplit, SchemaError, Table};

/// Normalization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Scale each feature to `[0, 1]` via its source min/max.
    MinMax,
    /// Center each feature to mean 0 and scale to unit variance.
    Standard,
}

/// Errors raised during preprocessing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PreprocessError {
    /// The partitions do not share identical feature columns.
    #[error("schema mismatch between partitions: {0}")]
    SchemaMismatch(#[from] SchemaError),

    /// A feature matrix has the wrong number of features for this scaler.
    #[error("scaler fitted on {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Frozen normalization parameters, one `(offset, scale)` pair per feature.
///
/// `transform` maps a value `v` to `(v - offset) / scale`. Degenerate
/// features (zero range or zero variance) use `scale = 1`, so every value
/// maps to 0 after centering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    method: Normalization,
    offset: Vec<f32>,
    scale: Vec<f32>,
}

impl Scaler {
    /// Fit normalization parameters on a feature matrix.
    ///
    /// Features are feature-major `[n_features, n_samples]`. Parameters are
    /// frozen at this point; later calls to [`Scaler::transform`] reuse them
    /// unchanged.
    pub fn fit(features: ArrayView2<f32>, method: Normalization) -> Scaler {
        let n_features = features.nrows();
        let mut offset = Vec::with_capacity(n_features);
        let mut scale = Vec::with_capacity(n_features);

        for f in 0..n_features {
            let row = features.row(f);
            let (o, s) = match method {
                Normalization::MinMax => {
                    let min = row.iter().copied().fold(f32::INFINITY, f32::min);
                    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                    let range = max - min;
                    (min, if range > 0.0 { range } else { 1.0 })
                }
                Normalization::Standard => {
                    let n = row.len().max(1) as f64;
                    let mean = row.iter().map(|&v| v as f64).sum::<f64>() / n;
                    let var = row
                        .iter()
                        .map(|&v| {
                            let d = v as f64 - mean;
                            d * d
                        })
                        .sum::<f64>()
                        / n;
                    let std = var.sqrt();
                    (mean as f32, if std > 0.0 { std as f32 } else { 1.0 })
                }
            };
            offset.push(o);
            scale.push(s);
        }

        Scaler {
            method,
            offset,
            scale,
        }
    }

    /// The method this scaler was fitted with.
    pub fn method(&self) -> Normalization {
        self.method
    }

    /// Number of features the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.offset.len()
    }

    /// Apply the frozen parameters to a feature matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::ShapeMismatch`] if the matrix has a
    /// different feature count than the one the scaler was fitted on.
    pub fn transform(&self, features: ArrayView2<f32>) -> Result<Array2<f32>, PreprocessError> {
        if features.nrows() != self.n_features() {
            return Err(PreprocessError::ShapeMismatch {
                expected: self.n_features(),
                got: features.nrows(),
            });
        }

        let mut out = features.to_owned();
        for (f, mut row) in out.rows_mut().into_iter().enumerate() {
            let offset = self.offset[f];
            let scale = self.scale[f];
            row.mapv_inplace(|v| (v - offset) / scale);
        }
        Ok(out)
    }
}

/// Normalized partitions plus the fitted scaler for reuse.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub source: DataSplit,
    pub valid: DataSplit,
    pub target: DataSplit,
    pub scaler: Scaler,
}

/// Extract features/labels from the three partitions and normalize them.
///
/// The scaler is fitted on the source partition only and applied to all
/// three partitions.
///
/// # Errors
///
/// Returns [`PreprocessError::SchemaMismatch`] if the tables do not share
/// identical feature columns.
pub fn prepare(
    source: &Table,
    valid: &Table,
    target: &Table,
    method: Normalization,
) -> Result<Prepared, PreprocessError> {
    source.schema().check_features_match(valid.schema())?;
    source.schema().check_features_match(target.schema())?;

    let scaler = Scaler::fit(source.features(), method);

    let normalize = |table: &Table| -> Result<DataSplit, PreprocessError> {
        Ok(DataSplit {
            features: scaler.transform(table.features())?,
            labels: table.labels().to_owned(),
        })
    };

    Ok(Prepared {
        source: normalize(source)?,
        valid: normalize(valid)?,
        target: normalize(target)?,
        scaler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableSchema;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};

    fn make_table(features: Array2<f32>, names: &[&str]) -> Table {
        let n_rows = features.ncols();
        Table::new(
            TableSchema {
                feature_names: names.iter().map(|s| s.to_string()).collect(),
                label: "y".into(),
                category: "cat".into(),
            },
            features,
            Array1::from_shape_fn(n_rows, |i| i as f32),
            vec!["a".to_string(); n_rows],
        )
    }

    #[test]
    fn minmax_source_in_unit_interval() {
        let features = array![[2.0, 4.0, 6.0, 10.0], [-1.0, 0.0, 1.0, 3.0]];
        let scaler = Scaler::fit(features.view(), Normalization::MinMax);
        let out = scaler.transform(features.view()).unwrap();

        for &v in out.iter() {
            assert!((0.0..=1.0).contains(&v), "value {v} outside [0, 1]");
        }
        assert_abs_diff_eq!(out[[0, 0]], 0.0);
        assert_abs_diff_eq!(out[[0, 3]], 1.0);
    }

    #[test]
    fn standard_source_mean_zero_std_one() {
        let features = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        let scaler = Scaler::fit(features.view(), Normalization::Standard);
        let out = scaler.transform(features.view()).unwrap();

        let n = out.len() as f64;
        let mean = out.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = out.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(var.sqrt(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn parameters_frozen_across_partitions() {
        let source = array![[0.0, 10.0]];
        let other = array![[20.0, -10.0]];
        let scaler = Scaler::fit(source.view(), Normalization::MinMax);
        let out = scaler.transform(other.view()).unwrap();

        // Outside the source range maps outside [0, 1]; the transform must
        // not refit on the new data.
        assert_abs_diff_eq!(out[[0, 0]], 2.0);
        assert_abs_diff_eq!(out[[0, 1]], -1.0);
    }

    #[test]
    fn constant_feature_maps_to_zero() {
        let features = array![[3.0, 3.0, 3.0]];
        for method in [Normalization::MinMax, Normalization::Standard] {
            let scaler = Scaler::fit(features.view(), method);
            let out = scaler.transform(features.view()).unwrap();
            assert!(out.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn transform_shape_mismatch() {
        let scaler = Scaler::fit(array![[1.0, 2.0], [3.0, 4.0]].view(), Normalization::MinMax);
        let err = scaler.transform(array![[1.0, 2.0]].view()).unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::ShapeMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn prepare_schema_mismatch() {
        let source = make_table(array![[1.0, 2.0]], &["x0"]);
        let valid = make_table(array![[1.0, 2.0]], &["other"]);
        let target = make_table(array![[1.0, 2.0]], &["x0"]);

        let err = prepare(&source, &valid, &target, Normalization::MinMax).unwrap_err();
        assert!(matches!(err, PreprocessError::SchemaMismatch(_)));
    }

    #[test]
    fn prepare_normalizes_all_partitions() {
        let source = make_table(array![[0.0, 10.0], [5.0, 15.0]], &["x0", "x1"]);
        let valid = make_table(array![[5.0, 5.0], [10.0, 10.0]], &["x0", "x1"]);
        let target = make_table(array![[10.0, 0.0], [15.0, 5.0]], &["x0", "x1"]);

        let prepared = prepare(&source, &valid, &target, Normalization::MinMax).unwrap();
        assert_eq!(prepared.source.n_samples(), 2);
        assert_abs_diff_eq!(prepared.valid.features[[0, 0]], 0.5);
        assert_abs_diff_eq!(prepared.target.features[[0, 0]], 1.0);
        assert_eq!(prepared.scaler.n_features(), 2);
    }
}
