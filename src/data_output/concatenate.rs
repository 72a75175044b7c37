// src/data_output/concatenate.rs

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{info, warn};

use crate::config::Strictness;
use crate::constants::OUTPUT_DELIMITER;
use crate::error::{ReformatError, Result};
use crate::measurement_names::Measurement;

/// Outcome of writing one combined "all conditions" file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatenationReport {
    pub measurement: Measurement,
    pub output: PathBuf,
    /// Line count of every input, in concatenation order.
    pub row_counts: Vec<usize>,
    pub rows_written: usize,
}

impl ConcatenationReport {
    /// True when some input had lines beyond the shortest one, which were dropped.
    pub fn truncated(&self) -> bool {
        self.row_counts.iter().any(|&n| n != self.rows_written)
    }
}

/// Order in which conditions are joined.
///
/// With `duplicate_control`, the control condition is placed last and repeated once per
/// non-control condition (at least once). Without it, every condition appears once in list order.
pub fn concatenation_order<'a>(
    conditions: &'a [String],
    control: Option<&str>,
    duplicate_control: bool,
) -> Vec<&'a str> {
    let control = match control {
        Some(control) if duplicate_control => control,
        _ => return conditions.iter().map(String::as_str).collect(),
    };

    let mut order: Vec<&str> = conditions
        .iter()
        .map(String::as_str)
        .filter(|c| *c != control)
        .collect();
    let non_control = order.len();
    if let Some(control_entry) = conditions.iter().find(|c| c.as_str() == control) {
        order.extend(std::iter::repeat(control_entry.as_str()).take(non_control.max(1)));
    }
    order
}

fn read_records(path: &Path) -> Result<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => ReformatError::io(path, io),
            other => ReformatError::malformed(path, 0, format!("{:?}", other)),
        })?;

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }
    Ok(records)
}

/// Joins same-numbered lines of `inputs` side by side into `output`.
///
/// Header lines are joined like data lines. Output stops at the shortest input; unequal
/// inputs are reported in the returned [`ConcatenationReport`], logged as a warning in
/// lenient mode and rejected in strict mode.
pub fn concatenate_files(
    inputs: &[PathBuf],
    output: &Path,
    measurement: Measurement,
    strictness: Strictness,
) -> Result<ConcatenationReport> {
    let tables: Vec<Vec<StringRecord>> = inputs
        .iter()
        .map(|path| read_records(path))
        .collect::<Result<_>>()?;

    let row_counts: Vec<usize> = tables.iter().map(Vec::len).collect();
    let rows_written = row_counts.iter().copied().min().unwrap_or(0);

    let report = ConcatenationReport {
        measurement,
        output: output.to_path_buf(),
        row_counts,
        rows_written,
    };

    if report.truncated() {
        if strictness == Strictness::Strict {
            return Err(ReformatError::RaggedConcatenation {
                measurement,
                counts: report.row_counts,
            });
        }
        warn!(
            "Concatenation inputs for {} have unequal line counts {:?}; output truncated to {} lines.",
            measurement, report.row_counts, rows_written
        );
    }

    let mut writer = WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_path(output)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => ReformatError::io(output, io),
            other => ReformatError::malformed(output, 0, format!("{:?}", other)),
        })?;

    for row_index in 0..rows_written {
        let mut combined = StringRecord::new();
        for table in &tables {
            combined.extend(table[row_index].iter());
        }
        writer.write_record(&combined)?;
    }
    writer.flush().map_err(|e| ReformatError::io(output, e))?;

    info!(
        "  Combined {} table saved as '{}' ({} inputs, {} lines).",
        measurement,
        output.display(),
        inputs.len(),
        rows_written
    );
    Ok(report)
}
