//! Evaluation metrics.
//!
//! Metrics compare predictions against ground truth and produce a scalar.
//! `compute` is fallible: RMSPE is undefined when every row is excluded, so
//! the degenerate case is an error rather than a silent zero.

use ndarray::ArrayView1;

/// Errors raised while computing a metric.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetricError {
    /// Predictions and actuals differ in length.
    #[error("predictions have {predictions} entries but actuals have {actuals}")]
    LengthMismatch { predictions: usize, actuals: usize },

    /// No valid rows remain; the metric is undefined.
    #[error("metric {metric} is undefined: no valid rows (all actuals zero or input empty)")]
    Degenerate { metric: &'static str },
}

/// A metric for evaluating prediction quality.
pub trait MetricFn {
    /// Compute the metric value.
    fn compute(
        &self,
        predictions: ArrayView1<f32>,
        actuals: ArrayView1<f32>,
    ) -> Result<f64, MetricError>;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// Name of the metric (for logging and reports).
    fn name(&self) -> &'static str;
}

fn check_lengths(
    predictions: ArrayView1<f32>,
    actuals: ArrayView1<f32>,
) -> Result<(), MetricError> {
    if predictions.len() != actuals.len() {
        return Err(MetricError::LengthMismatch {
            predictions: predictions.len(),
            actuals: actuals.len(),
        });
    }
    Ok(())
}

// =============================================================================
// RMSPE (Root Mean Squared Percentage Error)
// =============================================================================

/// Root Mean Squared Percentage Error:
/// `sqrt(mean(((actual - predicted) / actual)^2))`.
///
/// Rows with `actual == 0` are excluded from the mean (the percentage error
/// is undefined there). If every row is excluded the metric itself is
/// undefined and [`MetricError::Degenerate`] is returned.
///
/// Lower is better. Scale-free: scaling actual and predicted by a common
/// nonzero constant leaves the value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmspe;

impl MetricFn for Rmspe {
    fn compute(
        &self,
        predictions: ArrayView1<f32>,
        actuals: ArrayView1<f32>,
    ) -> Result<f64, MetricError> {
        check_lengths(predictions, actuals)?;

        let mut sum_sq = 0.0f64;
        let mut n_valid = 0usize;
        for (&p, &a) in predictions.iter().zip(actuals.iter()) {
            if a == 0.0 {
                continue;
            }
            let pct = ((a as f64) - (p as f64)) / (a as f64);
            sum_sq += pct * pct;
            n_valid += 1;
        }

        if n_valid == 0 {
            return Err(MetricError::Degenerate {
                metric: self.name(),
            });
        }
        Ok((sum_sq / n_valid as f64).sqrt())
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "rmspe"
    }
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: `sqrt(mean((pred - actual)^2))`.
///
/// Lower is better. Scale-sensitive, unlike [`Rmspe`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(
        &self,
        predictions: ArrayView1<f32>,
        actuals: ArrayView1<f32>,
    ) -> Result<f64, MetricError> {
        check_lengths(predictions, actuals)?;
        if predictions.is_empty() {
            return Err(MetricError::Degenerate {
                metric: self.name(),
            });
        }

        let sum_sq: f64 = predictions
            .iter()
            .zip(actuals.iter())
            .map(|(&p, &a)| {
                let diff = (p as f64) - (a as f64);
                diff * diff
            })
            .sum();
        Ok((sum_sq / predictions.len() as f64).sqrt())
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn rmspe_perfect() {
        let preds = array![1.0, 2.0, 3.0];
        let actuals = array![1.0, 2.0, 3.0];
        let value = Rmspe.compute(preds.view(), actuals.view()).unwrap();
        assert!(value.abs() < 1e-10);
    }

    #[test]
    fn rmspe_known_value() {
        // Errors: (2-1)/2 = 0.5, (4-3)/4 = 0.25
        // sqrt((0.25 + 0.0625) / 2) = sqrt(0.15625)
        let preds = array![1.0, 3.0];
        let actuals = array![2.0, 4.0];
        let value = Rmspe.compute(preds.view(), actuals.view()).unwrap();
        assert_abs_diff_eq!(value, 0.15625f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn rmspe_excludes_zero_actuals() {
        // The zero-actual row would contribute an infinite percentage error;
        // it must be dropped, leaving only the second row.
        let preds = array![5.0, 1.0];
        let actuals = array![0.0, 2.0];
        let value = Rmspe.compute(preds.view(), actuals.view()).unwrap();
        assert_abs_diff_eq!(value, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn rmspe_all_zero_actuals_degenerate() {
        let preds = array![1.0, 2.0];
        let actuals = array![0.0, 0.0];
        let err = Rmspe.compute(preds.view(), actuals.view()).unwrap_err();
        assert!(matches!(err, MetricError::Degenerate { metric: "rmspe" }));
    }

    #[test]
    fn rmspe_empty_degenerate() {
        let empty = Array1::<f32>::zeros(0);
        let err = Rmspe.compute(empty.view(), empty.view()).unwrap_err();
        assert!(matches!(err, MetricError::Degenerate { .. }));
    }

    #[test]
    fn rmspe_length_mismatch() {
        let preds = array![1.0, 2.0];
        let actuals = array![1.0];
        let err = Rmspe.compute(preds.view(), actuals.view()).unwrap_err();
        assert!(matches!(
            err,
            MetricError::LengthMismatch {
                predictions: 2,
                actuals: 1,
            }
        ));
    }

    #[test]
    fn rmspe_scale_invariant_rmse_not() {
        let preds = array![1.0, 3.0];
        let actuals = array![2.0, 4.0];
        let preds_scaled = array![10.0, 30.0];
        let actuals_scaled = array![20.0, 40.0];

        let rmspe = Rmspe.compute(preds.view(), actuals.view()).unwrap();
        let rmspe_scaled = Rmspe
            .compute(preds_scaled.view(), actuals_scaled.view())
            .unwrap();
        assert_abs_diff_eq!(rmspe, rmspe_scaled, epsilon = 1e-10);

        let rmse = Rmse.compute(preds.view(), actuals.view()).unwrap();
        let rmse_scaled = Rmse
            .compute(preds_scaled.view(), actuals_scaled.view())
            .unwrap();
        assert_abs_diff_eq!(rmse_scaled, rmse * 10.0, epsilon = 1e-9);
        assert!(rmse_scaled > rmse);
    }

    #[test]
    fn rmse_known_value() {
        // sqrt((1 + 4) / 2)
        let preds = array![1.0, 2.0];
        let actuals = array![0.0, 0.0];
        let value = Rmse.compute(preds.view(), actuals.view()).unwrap();
        assert_abs_diff_eq!(value, 2.5f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn metric_properties() {
        assert!(!Rmspe.higher_is_better());
        assert!(!Rmse.higher_is_better());
        assert_eq!(Rmspe.name(), "rmspe");
        assert_eq!(Rmse.name(), "rmse");
    }
}
