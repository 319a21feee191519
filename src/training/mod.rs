//! Model training: the regressor capability seam, the weighted and baseline
//! training arms, evaluation metrics, and stage logging.
//!
//! ## Regressor seam
//!
//! Any regression model that can fit sample-weighted squared loss and
//! predict implements [`Regressor`]. The pipeline is polymorphic over the
//! concrete model; [`LinearRegressor`] is the in-crate implementation.
//!
//! ## Training arms
//!
//! - [`fit_weighted`]: fits with externally computed per-sample weights
//! - [`fit_baseline`]: the control arm, implicit uniform weights
//!
//! ## Metrics
//!
//! - [`Rmspe`]: root mean squared percentage error (the report metric)
//! - [`Rmse`]: root mean squared error (secondary read-out)

mod linear;
mod logger;
mod metrics;

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::data::DataSplit;

pub use linear::{LinearParams, LinearRegressor};
pub use logger::{PipelineLogger, Verbosity};
pub use metrics::{MetricError, MetricFn, Rmse, Rmspe};

/// Errors raised while fitting a model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrainError {
    /// Weight vector length does not match the number of samples.
    #[error("weight vector has {got} entries but the data has {expected} samples")]
    ShapeMismatch { expected: usize, got: usize },

    /// The model cannot be fitted on this data.
    #[error("training failed: {0}")]
    Unfittable(String),
}

/// A regression model that supports sample-weighted fitting.
///
/// Weights are raw importance multipliers on the per-sample loss; they are
/// consumed as-is, with no normalization. `weights: None` means uniform.
///
/// Features are feature-major `[n_features, n_samples]` throughout.
pub trait Regressor {
    /// Fit the model, replacing any previous fit.
    fn fit(
        &mut self,
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        weights: Option<ArrayView1<f32>>,
    ) -> Result<(), TrainError>;

    /// Predict one value per sample.
    fn predict(&self, features: ArrayView2<f32>) -> Array1<f32>;
}

/// Fit a model on value-weighted samples.
///
/// Validates the weight vector length before any fitting occurs: on
/// [`TrainError::ShapeMismatch`] the model is untouched.
pub fn fit_weighted<R: Regressor>(
    model: &mut R,
    data: &DataSplit,
    weights: ArrayView1<f32>,
) -> Result<(), TrainError> {
    if weights.len() != data.n_samples() {
        return Err(TrainError::ShapeMismatch {
            expected: data.n_samples(),
            got: weights.len(),
        });
    }
    model.fit(data.features.view(), data.labels.view(), Some(weights))
}

/// Fit a model with implicit uniform weights (the control arm).
pub fn fit_baseline<R: Regressor>(model: &mut R, data: &DataSplit) -> Result<(), TrainError> {
    model.fit(data.features.view(), data.labels.view(), None)
}
