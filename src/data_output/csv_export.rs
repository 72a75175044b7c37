// src/data_output/csv_export.rs

use std::path::Path;

use csv::WriterBuilder;
use log::info;

use crate::constants::{MISSING_VALUE_MARKER, OUTPUT_DELIMITER};
use crate::data_analysis::extraction::MeasurementTable;
use crate::error::{ReformatError, Result};
use crate::types::Cell;

/// Formats one exported value.
///
/// Integral values keep one decimal place ("10.0"); everything else uses the shortest
/// representation that round-trips. Missing values become the missing-value marker.
///
/// Output is always positional, never exponent form: `8.5e-8` prints as `0.000000085`.
/// Values are identical to an exponent-form writer but the text is not byte-compatible
/// below `1e-4` or for very large magnitudes.
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        None => MISSING_VALUE_MARKER.to_string(),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => format!("{:.1}", v),
        Some(v) => format!("{}", v),
    }
}

/// The three header rows: condition, subject and trial number per output column.
pub fn header_rows(condition: &str, subjects: &[String], num_trials: usize) -> [Vec<String>; 3] {
    let columns = subjects.len() * num_trials;
    let conditions = vec![condition.to_string(); columns];
    let subject_row: Vec<String> = subjects
        .iter()
        .flat_map(|s| std::iter::repeat(s.clone()).take(num_trials))
        .collect();
    let trial_row: Vec<String> = subjects
        .iter()
        .flat_map(|_| (1..=num_trials).map(|t| t.to_string()))
        .collect();
    [conditions, subject_row, trial_row]
}

/// Writes one (condition, measurement) table: three header rows, then one row per timepoint.
///
/// Returns the number of data rows written.
pub fn write_measurement_table(path: &Path, condition: &str, table: &MeasurementTable) -> Result<usize> {
    let rows = table.to_rows()?;

    let mut writer = WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => ReformatError::io(path, io),
            other => ReformatError::malformed(path, 0, format!("{:?}", other)),
        })?;

    for header in header_rows(condition, table.subjects(), table.num_trials()) {
        writer.write_record(&header)?;
    }
    for row in rows.outer_iter() {
        writer.write_record(row.iter().map(format_cell))?;
    }
    writer.flush().map_err(|e| ReformatError::io(path, e))?;

    info!(
        "  {} table saved as '{}' ({} rows x {} columns).",
        table.measurement(),
        path.display(),
        rows.nrows(),
        rows.ncols()
    );
    Ok(rows.nrows())
}
