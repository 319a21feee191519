//! Source/validation/target partitioning.
//!
//! The validation and target partitions are drawn from the rows carrying the
//! target category (the distribution of interest); the source partition is
//! drawn from a pool selected by [`SourcePolicy`]. All sampling is seeded.
//!
//! # Ordering
//!
//! Validation is sampled first from the category rows. The source pool is
//! then formed per policy with validation rows removed, source is sampled
//! from that pool, and the target partition is every category row not taken
//! by validation or source. The three partitions are pairwise disjoint for
//! every policy.

use std::path::Path;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::io::{write_table, TableIoError};
use super::table::Table;

/// How the source partition's candidate pool is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourcePolicy {
    /// Source may come from any row.
    All,
    /// Source excludes rows carrying the target category.
    Complement,
    /// Source contains only rows carrying the target category.
    CategoryOnly,
}

/// Split sizing and policy. Immutable per run; the seed makes row sampling
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSpec {
    /// Number of rows sampled into the source partition.
    pub source_count: usize,
    /// Number of rows sampled into the validation partition.
    pub valid_count: usize,
    /// Source pool selection policy.
    pub policy: SourcePolicy,
    /// Target category value: validation and target rows carry this value.
    pub category: String,
    /// RNG seed for row sampling.
    pub seed: u64,
}

/// The three disjoint partitions produced by [`split_table`].
#[derive(Debug, Clone)]
pub struct SplitOutput {
    /// Training data, potentially distribution-shifted from target.
    pub source: Table,
    /// Small sample from the target distribution, guides data valuation.
    pub valid: Table,
    /// Held-out evaluation data from the distribution of interest.
    pub target: Table,
}

/// Errors raised while splitting.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SplitError {
    /// A requested partition size exceeds the rows available for it.
    #[error("{partition}: requested {requested} rows but only {available} available")]
    InsufficientData {
        partition: &'static str,
        requested: usize,
        available: usize,
    },
}

/// Partition a table into source/validation/target subsets.
///
/// # Errors
///
/// Returns [`SplitError::InsufficientData`] if `valid_count` exceeds the
/// rows carrying the target category, or `source_count` exceeds the policy
/// pool after validation rows are removed.
///
/// # Example
///
/// ```
/// use shiftval::{split_table, SourcePolicy, SplitSpec, Table, TableSchema};
/// use ndarray::{Array1, Array2};
///
/// let categories: Vec<String> =
///     ["a", "a", "b", "b", "b", "c"].iter().map(|s| s.to_string()).collect();
/// let table = Table::new(
///     TableSchema {
///         feature_names: vec!["x".into()],
///         label: "y".into(),
///         category: "cat".into(),
///     },
///     Array2::from_shape_fn((1, 6), |(_, c)| c as f32),
///     Array1::from_shape_fn(6, |i| i as f32),
///     categories,
/// );
///
/// let spec = SplitSpec {
///     source_count: 2,
///     valid_count: 1,
///     policy: SourcePolicy::Complement,
///     category: "b".into(),
///     seed: 7,
/// };
/// let split = split_table(&table, &spec).unwrap();
/// assert_eq!(split.valid.n_rows(), 1);
/// assert_eq!(split.target.n_rows(), 2);
/// assert!(split.source.categories().iter().all(|c| c != "b"));
/// ```
pub fn split_table(table: &Table, spec: &SplitSpec) -> Result<SplitOutput, SplitError> {
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let category_rows = table.rows_with_category(&spec.category);
    if spec.valid_count > category_rows.len() {
        return Err(SplitError::InsufficientData {
            partition: "validation",
            requested: spec.valid_count,
            available: category_rows.len(),
        });
    }

    let valid_rows = sample_rows(&category_rows, spec.valid_count, &mut rng);

    let in_valid = |row: usize| valid_rows.binary_search(&row).is_ok();
    let pool: Vec<usize> = match spec.policy {
        SourcePolicy::All => (0..table.n_rows()).filter(|&r| !in_valid(r)).collect(),
        SourcePolicy::Complement => (0..table.n_rows())
            .filter(|&r| table.categories()[r] != spec.category)
            .collect(),
        SourcePolicy::CategoryOnly => category_rows
            .iter()
            .copied()
            .filter(|&r| !in_valid(r))
            .collect(),
    };

    if spec.source_count > pool.len() {
        return Err(SplitError::InsufficientData {
            partition: "source",
            requested: spec.source_count,
            available: pool.len(),
        });
    }

    let source_rows = sample_rows(&pool, spec.source_count, &mut rng);

    let in_source = |row: usize| source_rows.binary_search(&row).is_ok();
    let target_rows: Vec<usize> = category_rows
        .iter()
        .copied()
        .filter(|&r| !in_valid(r) && !in_source(r))
        .collect();

    Ok(SplitOutput {
        source: table.select(&source_rows),
        valid: table.select(&valid_rows),
        target: table.select(&target_rows),
    })
}

/// Sample `count` rows from `candidates` without replacement.
///
/// Returns sorted indices so partitions preserve the table's row order.
fn sample_rows(candidates: &[usize], count: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut shuffled = candidates.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled.sort_unstable();
    shuffled
}

/// Persist the three partitions as `source.csv`, `valid.csv`, `target.csv`.
///
/// This is the cross-process contract: a later run can pick the partitions
/// up with [`super::read_table`] instead of re-splitting.
pub fn write_partitions(dir: impl AsRef<Path>, split: &SplitOutput) -> Result<(), TableIoError> {
    let dir = dir.as_ref();
    write_table(dir.join("source.csv"), &split.source)?;
    write_table(dir.join("valid.csv"), &split.valid)?;
    write_table(dir.join("target.csv"), &split.target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableSchema;
    use ndarray::{Array1, Array2};

    fn table_with_categories(categories: &[&str]) -> Table {
        let n = categories.len();
        Table::new(
            TableSchema {
                feature_names: vec!["x".into()],
                label: "y".into(),
                category: "cat".into(),
            },
            Array2::from_shape_fn((1, n), |(_, c)| c as f32),
            Array1::from_shape_fn(n, |i| 100.0 + i as f32),
            categories.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn spec(policy: SourcePolicy, source_count: usize, valid_count: usize) -> SplitSpec {
        SplitSpec {
            source_count,
            valid_count,
            policy,
            category: "b".into(),
            seed: 42,
        }
    }

    /// The ten-row scenario: [A,A,B,B,B,C,C,D,D,D], complement policy.
    #[test]
    fn complement_scenario() {
        let table = table_with_categories(&["a", "a", "b", "b", "b", "c", "c", "d", "d", "d"]);
        let split = split_table(&table, &spec(SourcePolicy::Complement, 5, 1)).unwrap();

        assert_eq!(split.valid.n_rows(), 1);
        assert_eq!(split.target.n_rows(), 2); // 3 b-rows minus validation draw
        assert_eq!(split.source.n_rows(), 5); // drawn from the 7 non-b rows
        assert!(split.source.categories().iter().all(|c| c != "b"));
        assert!(split.valid.categories().iter().all(|c| c == "b"));
        assert!(split.target.categories().iter().all(|c| c == "b"));
    }

    #[test]
    fn category_only_source_is_all_category() {
        let table = table_with_categories(&["a", "b", "b", "b", "b", "c"]);
        let split = split_table(&table, &spec(SourcePolicy::CategoryOnly, 2, 1)).unwrap();

        assert_eq!(split.source.n_rows(), 2);
        assert!(split.source.categories().iter().all(|c| c == "b"));
        assert_eq!(split.target.n_rows(), 1);
    }

    #[test]
    fn partitions_are_disjoint_for_all_policies() {
        // Labels are unique per row, so they identify rows across partitions.
        let table = table_with_categories(&["a", "a", "b", "b", "b", "c", "c", "d", "d", "d"]);
        for policy in [
            SourcePolicy::All,
            SourcePolicy::Complement,
            SourcePolicy::CategoryOnly,
        ] {
            let split = split_table(&table, &spec(policy, 2, 1)).unwrap();
            let mut seen: Vec<i64> = split
                .source
                .labels()
                .iter()
                .chain(split.valid.labels().iter())
                .chain(split.target.labels().iter())
                .map(|&l| l as i64)
                .collect();
            let total = seen.len();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), total, "overlap under {:?}", policy);
        }
    }

    #[test]
    fn same_seed_same_split() {
        let table = table_with_categories(&["a", "b", "b", "b", "c", "c", "d", "d"]);
        let s = spec(SourcePolicy::All, 3, 1);
        let first = split_table(&table, &s).unwrap();
        let second = split_table(&table, &s).unwrap();
        assert_eq!(first.source.labels(), second.source.labels());
        assert_eq!(first.valid.labels(), second.valid.labels());
        assert_eq!(first.target.labels(), second.target.labels());
    }

    #[test]
    fn insufficient_validation_rows() {
        let table = table_with_categories(&["a", "b", "c"]);
        let err = split_table(&table, &spec(SourcePolicy::All, 1, 2)).unwrap_err();
        assert!(matches!(
            err,
            SplitError::InsufficientData {
                partition: "validation",
                requested: 2,
                available: 1,
            }
        ));
    }

    #[test]
    fn insufficient_source_rows() {
        let table = table_with_categories(&["a", "b", "b"]);
        let err = split_table(&table, &spec(SourcePolicy::Complement, 2, 1)).unwrap_err();
        assert!(matches!(
            err,
            SplitError::InsufficientData {
                partition: "source",
                requested: 2,
                available: 1,
            }
        ));
    }

    #[test]
    fn write_partitions_files() {
        let table = table_with_categories(&["a", "a", "b", "b", "b", "c"]);
        let split = split_table(&table, &spec(SourcePolicy::Complement, 2, 1)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        write_partitions(dir.path(), &split).unwrap();

        let source = crate::data::read_table(dir.path().join("source.csv"), "y", "cat").unwrap();
        assert_eq!(source.labels(), split.source.labels());
        assert!(dir.path().join("valid.csv").exists());
        assert!(dir.path().join("target.csv").exists());
    }
}
