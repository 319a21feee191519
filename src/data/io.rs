//! CSV reading and writing for tables.
//!
//! The on-disk contract: a delimited file with a header row, one numeric
//! label column, one string category column, and arbitrary numeric feature
//! columns. Partition files written by [`super::write_partitions`] use the
//! same format, so a run can be resumed from disk in another process.

use std::io;
use std::path::Path;

use ndarray::{Array1, Array2};

use super::table::{Table, TableSchema};

/// Errors that can occur when loading or writing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("file has no header row")]
    MissingHeader,

    #[error("row {row}: failed to parse {column} value {value:?} as a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: expected {expected} fields, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
}

/// Read a table from a CSV file.
///
/// Every column other than `label_column` and `category_column` is parsed
/// as a numeric feature. Feature order follows the header.
pub fn read_table(
    path: impl AsRef<Path>,
    label_column: &str,
    category_column: &str,
) -> Result<Table, TableIoError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|_| TableIoError::MissingHeader)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| TableIoError::MissingColumn(label_column.to_string()))?;
    let category_idx = headers
        .iter()
        .position(|h| h == category_column)
        .ok_or_else(|| TableIoError::MissingColumn(category_column.to_string()))?;

    let feature_cols: Vec<usize> = (0..headers.len())
        .filter(|&i| i != label_idx && i != category_idx)
        .collect();
    let feature_names: Vec<String> = feature_cols.iter().map(|&i| headers[i].clone()).collect();

    let mut feature_data: Vec<Vec<f32>> = vec![Vec::new(); feature_cols.len()];
    let mut labels = Vec::new();
    let mut categories = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(TableIoError::RaggedRow {
                row: row_idx,
                expected: headers.len(),
                got: record.len(),
            });
        }

        let parse = |col: usize| -> Result<f32, TableIoError> {
            let raw = &record[col];
            raw.trim()
                .parse::<f32>()
                .map_err(|_| TableIoError::InvalidNumber {
                    row: row_idx,
                    column: headers[col].clone(),
                    value: raw.to_string(),
                })
        };

        for (slot, &col) in feature_cols.iter().enumerate() {
            feature_data[slot].push(parse(col)?);
        }
        labels.push(parse(label_idx)?);
        categories.push(record[category_idx].to_string());
    }

    let n_rows = labels.len();
    let n_features = feature_cols.len();
    let mut features = Array2::zeros((n_features, n_rows));
    for (f, column) in feature_data.into_iter().enumerate() {
        for (r, value) in column.into_iter().enumerate() {
            features[[f, r]] = value;
        }
    }

    let schema = TableSchema {
        feature_names,
        label: label_column.to_string(),
        category: category_column.to_string(),
    };

    Ok(Table::new(schema, features, Array1::from_vec(labels), categories))
}

/// Write a table to a CSV file.
///
/// Columns are written in schema order: features, then label, then category.
/// Reading the file back with [`read_table`] yields an identical table.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<(), TableIoError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;

    let schema = table.schema();
    let mut header: Vec<&str> = schema.feature_names.iter().map(|s| s.as_str()).collect();
    header.push(&schema.label);
    header.push(&schema.category);
    writer.write_record(&header)?;

    let features = table.features();
    let labels = table.labels();
    for row in 0..table.n_rows() {
        let mut record: Vec<String> = (0..table.n_features())
            .map(|f| features[[f, row]].to_string())
            .collect();
        record.push(labels[row].to_string());
        record.push(table.categories()[row].clone());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
