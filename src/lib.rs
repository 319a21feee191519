//! shiftval: value-weighted training evaluation under distribution shift.
//!
//! Training data is often drawn from a different distribution than the data
//! a model is evaluated on. Given per-sample value scores from a data
//! valuator, this crate measures whether weighting the training loss by
//! those scores improves target-distribution accuracy over uniform weights.
//!
//! # Key Types
//!
//! - [`Table`] - Tabular container with a category column for splitting
//! - [`SplitSpec`] / [`SourcePolicy`] - Source/validation/target partitioning
//! - [`Scaler`] / [`Normalization`] - Feature normalization fit on source only
//! - [`Regressor`] - Capability trait for sample-weighted regression models
//! - [`DataValuer`] - Capability trait for per-sample value scoring
//! - [`PipelineConfig`] / [`EvalReport`] - End-to-end run and comparison
//!
//! # Pipeline
//!
//! ```text
//! Table -> split -> prepare -> valuer.score -> weighted + baseline fit -> RMSPE
//! ```
//!
//! Each stage consumes immutable inputs and produces new outputs; any stage
//! error aborts the run. Sampling is seeded, so runs are reproducible.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod pipeline;
pub mod preprocess;
pub mod training;
pub mod valuation;

// High-level pipeline types
pub use pipeline::{run, EvalReport, PipelineConfig, PipelineError};

// Data types
pub use data::{
    read_table, split_table, write_partitions, write_table, DataSplit, SchemaError, SourcePolicy,
    SplitError, SplitOutput, SplitSpec, Table, TableIoError, TableSchema,
};

// Preprocessing
pub use preprocess::{prepare, Normalization, PreprocessError, Prepared, Scaler};

// Training types (model seam, metrics, logging)
pub use training::{
    fit_baseline, fit_weighted, LinearParams, LinearRegressor, MetricError, MetricFn,
    PipelineLogger, Regressor, Rmse, Rmspe, TrainError, Verbosity,
};

// Valuation seam
pub use valuation::{DataValuer, SimilarityValuer, UniformValuer, ValuationError};
