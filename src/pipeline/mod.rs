//! End-to-end pipeline: split, prepare, value, train, evaluate.
//!
//! ```text
//! Table -> split_table -> prepare -> valuer.fit/score
//!       -> fit_weighted + fit_baseline -> Rmspe/Rmse on target
//! ```
//!
//! Every stage consumes immutable inputs and produces new outputs; the
//! first stage error aborts the run. Stages are also callable on their own
//! (see [`crate::data::split_table`], [`crate::preprocess::prepare`]) when a
//! run is split across processes via the partition files.

use serde::{Deserialize, Serialize};

use crate::data::{split_table, SplitError, SplitSpec, Table};
use crate::preprocess::{prepare, Normalization, PreprocessError};
use crate::training::{
    fit_baseline, fit_weighted, MetricError, MetricFn, PipelineLogger, Regressor, Rmse, Rmspe,
    TrainError, Verbosity,
};
use crate::valuation::{DataValuer, ValuationError};

/// Errors from any pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("split failed: {0}")]
    Split(#[from] SplitError),

    #[error("preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    #[error("training failed: {0}")]
    Train(#[from] TrainError),

    #[error("evaluation failed: {0}")]
    Metric(#[from] MetricError),
}

/// Configuration for one pipeline run. Immutable; construct a new value to
/// change anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Partition sizing, policy, and seed.
    pub split: SplitSpec,
    /// Feature normalization method.
    pub normalization: Normalization,
    /// Progress output level.
    #[serde(skip, default)]
    pub verbosity: Verbosity,
}

/// The comparative report produced at the end of a run.
///
/// RMSPE is the headline metric (lower is better); RMSE is a secondary,
/// scale-sensitive read-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Target RMSPE of the value-weighted model.
    pub weighted_rmspe: f64,
    /// Target RMSPE of the uniform-weight control.
    pub baseline_rmspe: f64,
    /// Target RMSE of the value-weighted model.
    pub weighted_rmse: f64,
    /// Target RMSE of the uniform-weight control.
    pub baseline_rmse: f64,
    /// Partition sizes, for the record.
    pub n_source: usize,
    pub n_valid: usize,
    pub n_target: usize,
}

impl EvalReport {
    /// Whether the value-weighted model beat the control on RMSPE.
    pub fn weighted_improved(&self) -> bool {
        self.weighted_rmspe < self.baseline_rmspe
    }
}

impl std::fmt::Display for EvalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "weighted: rmspe {:.6}, rmse {:.6}",
            self.weighted_rmspe, self.weighted_rmse
        )?;
        write!(
            f,
            "baseline: rmspe {:.6}, rmse {:.6}",
            self.baseline_rmspe, self.baseline_rmse
        )
    }
}

/// Run the full pipeline on a table.
///
/// `make_model` is called once per training arm so the weighted and
/// baseline models are fresh instances of the same class.
///
/// # Example
///
/// ```no_run
/// use shiftval::{
///     run, LinearRegressor, Normalization, PipelineConfig, SimilarityValuer, SourcePolicy,
///     SplitSpec, Verbosity,
/// };
///
/// # fn load() -> shiftval::Table { unimplemented!() }
/// let table = load();
/// let config = PipelineConfig {
///     split: SplitSpec {
///         source_count: 1000,
///         valid_count: 100,
///         policy: SourcePolicy::Complement,
///         category: "b".into(),
///         seed: 42,
///     },
///     normalization: Normalization::MinMax,
///     verbosity: Verbosity::Info,
/// };
/// let mut valuer = SimilarityValuer::default();
/// let report = run(&table, &config, &mut valuer, LinearRegressor::default).unwrap();
/// println!("{report}");
/// ```
pub fn run<R, F>(
    table: &Table,
    config: &PipelineConfig,
    valuer: &mut dyn DataValuer,
    make_model: F,
) -> Result<EvalReport, PipelineError>
where
    R: Regressor,
    F: Fn() -> R,
{
    let logger = PipelineLogger::new(config.verbosity);

    let split = split_table(table, &config.split)?;
    logger.info(format!(
        "split: {} source, {} valid, {} target rows (policy {:?})",
        split.source.n_rows(),
        split.valid.n_rows(),
        split.target.n_rows(),
        config.split.policy,
    ));

    let prepared = prepare(
        &split.source,
        &split.valid,
        &split.target,
        config.normalization,
    )?;
    logger.debug(format!(
        "normalized {} features with {:?}",
        prepared.scaler.n_features(),
        config.normalization,
    ));

    valuer.fit(&prepared.source, &prepared.valid)?;
    let weights = valuer.score(&prepared.source)?;
    logger.debug(format!(
        "value scores: min {:.4}, max {:.4}",
        weights.iter().copied().fold(f32::INFINITY, f32::min),
        weights.iter().copied().fold(f32::NEG_INFINITY, f32::max),
    ));

    let mut weighted_model = make_model();
    fit_weighted(&mut weighted_model, &prepared.source, weights.view())?;

    let mut baseline_model = make_model();
    fit_baseline(&mut baseline_model, &prepared.source)?;

    let weighted_preds = weighted_model.predict(prepared.target.features.view());
    let baseline_preds = baseline_model.predict(prepared.target.features.view());
    let actuals = prepared.target.labels.view();

    let report = EvalReport {
        weighted_rmspe: Rmspe.compute(weighted_preds.view(), actuals)?,
        baseline_rmspe: Rmspe.compute(baseline_preds.view(), actuals)?,
        weighted_rmse: Rmse.compute(weighted_preds.view(), actuals)?,
        baseline_rmse: Rmse.compute(baseline_preds.view(), actuals)?,
        n_source: split.source.n_rows(),
        n_valid: split.valid.n_rows(),
        n_target: split.target.n_rows(),
    };
    logger.info(format!(
        "weighted rmspe {:.6} vs baseline rmspe {:.6}",
        report.weighted_rmspe, report.baseline_rmspe,
    ));

    Ok(report)
}
