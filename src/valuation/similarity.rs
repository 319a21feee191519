//! Nearest-validation-neighbor similarity valuation.

use ndarray::{Array1, Array2, ArrayView2};

use crate::data::DataSplit;

use super::{DataValuer, ValuationError};

/// Scores a sample by its proximity to the validation set in normalized
/// feature space: `exp(-gamma * d)` where `d` is the squared Euclidean
/// distance to the nearest validation sample.
///
/// Samples that resemble the target distribution score near 1; samples far
/// from it decay toward 0. A cheap stand-in for a learned valuator with the
/// same qualitative shape, used for tests and as a reference point.
#[derive(Debug, Clone)]
pub struct SimilarityValuer {
    gamma: f32,
    /// Validation features captured at fit time; `None` until fitted.
    reference: Option<Array2<f32>>,
}

impl SimilarityValuer {
    /// Create a valuer with the given kernel width.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `gamma` is positive.
    pub fn new(gamma: f32) -> Self {
        debug_assert!(gamma > 0.0, "gamma must be positive, got {}", gamma);
        Self {
            gamma,
            reference: None,
        }
    }
}

impl Default for SimilarityValuer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DataValuer for SimilarityValuer {
    fn fit(&mut self, source: &DataSplit, valid: &DataSplit) -> Result<(), ValuationError> {
        if source.n_features() != valid.n_features() {
            return Err(ValuationError::ShapeMismatch {
                expected: source.n_features(),
                got: valid.n_features(),
            });
        }
        self.reference = Some(valid.features.clone());
        Ok(())
    }

    fn score(&self, data: &DataSplit) -> Result<Array1<f32>, ValuationError> {
        let reference = self.reference.as_ref().ok_or(ValuationError::NotFitted)?;
        if data.n_features() != reference.nrows() {
            return Err(ValuationError::ShapeMismatch {
                expected: reference.nrows(),
                got: data.n_features(),
            });
        }

        let features = data.features.view();
        let scores = (0..data.n_samples())
            .map(|i| {
                let d = nearest_sq_distance(features, i, reference.view());
                (-self.gamma * d).exp()
            })
            .collect();
        Ok(scores)
    }
}

/// Squared Euclidean distance from sample `i` of `features` to its nearest
/// column of `reference`. Both matrices are feature-major.
fn nearest_sq_distance(features: ArrayView2<f32>, i: usize, reference: ArrayView2<f32>) -> f32 {
    let n_features = features.nrows();
    let mut best = f32::INFINITY;
    for v in 0..reference.ncols() {
        let mut d = 0.0f32;
        for f in 0..n_features {
            let diff = features[[f, i]] - reference[[f, v]];
            d += diff * diff;
        }
        best = best.min(d);
    }
    best
}
