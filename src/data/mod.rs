//! Tabular data containers and partitioning.
//!
//! # Overview
//!
//! [`Table`] holds a raw tabular dataset: numeric feature columns in
//! **feature-major** layout `[n_features, n_rows]`, a numeric label column,
//! and a string category column used for distribution-shift splitting.
//!
//! [`split_table`] partitions a table into source/validation/target subsets
//! according to a [`SplitSpec`], and [`DataSplit`] is the normalized numeric
//! form consumed by valuation and training.
//!
//! # Storage Layout
//!
//! Features are feature-major: each feature's values across all rows are
//! contiguous in memory. This matches the access pattern of the coordinate
//! descent trainer, which iterates one feature at a time.

mod io;
mod partition;
mod table;

use ndarray::{Array1, Array2};

pub use io::{read_table, write_table, TableIoError};
pub use partition::{split_table, write_partitions, SourcePolicy, SplitError, SplitOutput, SplitSpec};
pub use table::{SchemaError, Table, TableSchema};

/// Numeric features and labels for one partition, ready for training.
///
/// Produced by [`crate::preprocess::prepare`] after normalization. Features
/// are feature-major `[n_features, n_samples]`.
#[derive(Debug, Clone)]
pub struct DataSplit {
    /// Feature matrix `[n_features, n_samples]`.
    pub features: Array2<f32>,
    /// Label values, length = n_samples.
    pub labels: Array1<f32>,
}

impl DataSplit {
    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.ncols()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }
}
