//! The data-valuation seam.
//!
//! A [`DataValuer`] assigns one non-negative score per training sample:
//! higher means the sample looks more useful for matching the validation
//! (target) distribution. The reinforcement-learning valuator this crate is
//! built to evaluate lives behind this trait as an external collaborator;
//! the implementations here are the uniform control and a cheap similarity
//! heuristic for tests and demos.
//!
//! Lifecycle: `fit` on the normalized source and validation partitions,
//! then `score` the source partition once. Scores are consumed by
//! [`crate::training::fit_weighted`] and not persisted beyond the run.

mod similarity;

use ndarray::Array1;

use crate::data::DataSplit;

pub use similarity::SimilarityValuer;

/// Errors raised by a data valuer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValuationError {
    /// `score` was called before `fit`.
    #[error("valuer has not been fitted")]
    NotFitted,

    /// Feature counts disagree between fit and score data.
    #[error("valuer fitted on {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Produces per-sample value scores from source and validation data.
pub trait DataValuer {
    /// Learn the valuation from the source partition, guided by the
    /// validation partition drawn from the target distribution.
    fn fit(&mut self, source: &DataSplit, valid: &DataSplit) -> Result<(), ValuationError>;

    /// Score each sample; one non-negative value per column of `data`.
    fn score(&self, data: &DataSplit) -> Result<Array1<f32>, ValuationError>;
}

/// Scores every sample 1.0. The degenerate valuer: weighting with it is
/// equivalent to the baseline arm.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformValuer;

impl DataValuer for UniformValuer {
    fn fit(&mut self, _source: &DataSplit, _valid: &DataSplit) -> Result<(), ValuationError> {
        Ok(())
    }

    fn score(&self, data: &DataSplit) -> Result<Array1<f32>, ValuationError> {
        Ok(Array1::ones(data.n_samples()))
    }
}
