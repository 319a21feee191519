//! Weighted linear regression via cyclic coordinate descent.
//!
//! Minimizes the sample-weighted squared loss with L2 regularization on the
//! coefficients. Each round performs one Newton step per coordinate in
//! sequence, maintaining residuals incrementally instead of recomputing
//! predictions. The bias term is updated unregularized after the features.
//!
//! # Data Format
//!
//! Requires feature-major layout `[n_features, n_samples]` so coordinate
//! iteration walks contiguous memory.

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{Regressor, TrainError};

/// Parameters for [`LinearRegressor`] training.
#[derive(Debug, Clone)]
pub struct LinearParams {
    /// Number of coordinate descent rounds.
    pub n_rounds: u32,
    /// Step size for coordinate updates.
    pub learning_rate: f32,
    /// L2 regularization (lambda) on coefficients. The bias is not
    /// regularized.
    pub lambda: f32,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            n_rounds: 100,
            learning_rate: 0.5,
            lambda: 1.0,
        }
    }
}

/// L2-regularized linear model with sample-weighted fitting.
///
/// # Example
///
/// ```
/// use shiftval::{LinearParams, LinearRegressor, Regressor};
/// use ndarray::array;
///
/// // y = 2 * x
/// let features = array![[0.0, 1.0, 2.0, 3.0]];
/// let targets = array![0.0, 2.0, 4.0, 6.0];
///
/// let mut model = LinearRegressor::new(LinearParams {
///     lambda: 0.0,
///     ..Default::default()
/// });
/// model.fit(features.view(), targets.view(), None).unwrap();
///
/// let preds = model.predict(features.view());
/// assert!((preds[2] - 4.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    params: LinearParams,
    /// One coefficient per feature; empty until fitted.
    coefficients: Vec<f32>,
    bias: f32,
}

impl LinearRegressor {
    /// Create an unfitted model.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            coefficients: Vec::new(),
            bias: 0.0,
        }
    }

    /// Fitted coefficients, one per feature. Empty before fitting.
    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    /// Fitted bias term.
    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl Default for LinearRegressor {
    fn default() -> Self {
        Self::new(LinearParams::default())
    }
}

impl Regressor for LinearRegressor {
    fn fit(
        &mut self,
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        weights: Option<ArrayView1<f32>>,
    ) -> Result<(), TrainError> {
        let n_features = features.nrows();
        let n_samples = features.ncols();

        if targets.len() != n_samples {
            return Err(TrainError::ShapeMismatch {
                expected: n_samples,
                got: targets.len(),
            });
        }
        if let Some(w) = weights {
            if w.len() != n_samples {
                return Err(TrainError::ShapeMismatch {
                    expected: n_samples,
                    got: w.len(),
                });
            }
        }
        if n_samples == 0 {
            return Err(TrainError::Unfittable("no training samples".to_string()));
        }

        let weight_at = |i: usize| weights.map_or(1.0, |w| w[i]);
        let total_weight: f64 = (0..n_samples).map(|i| weight_at(i) as f64).sum();
        if total_weight <= 0.0 {
            return Err(TrainError::Unfittable(
                "total sample weight is zero".to_string(),
            ));
        }

        self.coefficients = vec![0.0; n_features];
        self.bias = 0.0;

        // Residuals start at the targets since all coefficients are zero.
        let mut residuals: Vec<f64> = targets.iter().map(|&t| t as f64).collect();

        let lambda = self.params.lambda as f64;
        let lr = self.params.learning_rate as f64;

        for _round in 0..self.params.n_rounds {
            for j in 0..n_features {
                let column = features.row(j);
                let mut grad = 0.0f64;
                let mut hess = 0.0f64;
                for i in 0..n_samples {
                    let x = column[i] as f64;
                    let w = weight_at(i) as f64;
                    grad += w * x * residuals[i];
                    hess += w * x * x;
                }
                // L2 pulls the coefficient toward zero.
                grad -= lambda * self.coefficients[j] as f64;
                hess += lambda;
                if hess <= 0.0 {
                    continue;
                }

                let delta = lr * grad / hess;
                self.coefficients[j] += delta as f32;
                for i in 0..n_samples {
                    residuals[i] -= delta * column[i] as f64;
                }
            }

            // Bias update: weighted mean residual, unregularized.
            let grad: f64 = (0..n_samples)
                .map(|i| weight_at(i) as f64 * residuals[i])
                .sum();
            let delta = lr * grad / total_weight;
            self.bias += delta as f32;
            for r in residuals.iter_mut() {
                *r -= delta;
            }
        }

        Ok(())
    }

    fn predict(&self, features: ArrayView2<f32>) -> Array1<f32> {
        let n_samples = features.ncols();
        let mut preds = Array1::from_elem(n_samples, self.bias);
        for (j, &coef) in self.coefficients.iter().enumerate() {
            if j >= features.nrows() {
                break;
            }
            let column = features.row(j);
            for i in 0..n_samples {
                preds[i] += coef * column[i];
            }
        }
        preds
    }
}
