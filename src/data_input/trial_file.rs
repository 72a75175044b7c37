// src/data_input/trial_file.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use log::debug;

use crate::constants::{
    AXIS_HEADER_LINE, DATA_TYPE_HEADER_LINE, FIRST_DATA_LINE, HEADER_LINE_COUNT, TRIAL_FILE_DELIMITER,
};
use crate::error::{ReformatError, Result};

/// One data row of a trial file together with its 1-based line number in the file.
#[derive(Debug, Clone)]
pub struct TrialRow {
    pub line: usize,
    pub cells: StringRecord,
}

impl TrialRow {
    /// Raw cell text; `None` when the row is shorter than `column`.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column)
    }
}

/// A fully materialized per-subject, per-condition trial file.
#[derive(Debug, Clone)]
pub struct TrialRecord {
    pub path: PathBuf,
    /// Header line 2, uppercased with spaces removed.
    pub data_types: Vec<String>,
    /// Header line 5, uppercased.
    pub axes: Vec<String>,
    pub rows: Vec<TrialRow>,
}

impl TrialRecord {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Normalizes header line 2: uppercase, spaces stripped, split on tabs.
pub fn parse_data_type_header(line: &str) -> Vec<String> {
    strip_line_ending(line)
        .to_uppercase()
        .replace(' ', "")
        .split(TRIAL_FILE_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Normalizes header line 5: uppercase, split on tabs.
pub fn parse_axis_header(line: &str) -> Vec<String> {
    strip_line_ending(line)
        .to_uppercase()
        .split(TRIAL_FILE_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Splits one data line on the trial-file delimiter. Quotes carry no meaning.
fn split_data_line(line: &str) -> StringRecord {
    StringRecord::from(line.split(TRIAL_FILE_DELIMITER).collect::<Vec<&str>>())
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Parses a trial file: five header lines followed by tab-separated data rows.
///
/// Data lines are numbered by their 1-based position in the file. Cells are kept as raw
/// text; numeric parsing happens per selected column during extraction so that unused
/// columns never have to be numeric.
pub fn parse_trial_file(path: &Path) -> Result<TrialRecord> {
    let file = File::open(path).map_err(|e| ReformatError::io(path, e))?;
    let mut reader = BufReader::new(file);

    // --- Header lines ---
    let mut header_lines: Vec<String> = Vec::with_capacity(HEADER_LINE_COUNT);
    for line_number in 1..=HEADER_LINE_COUNT {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).map_err(|e| ReformatError::io(path, e))?;
        if bytes == 0 {
            return Err(ReformatError::malformed(
                path,
                line_number,
                format!("expected {} header lines, file ended early", HEADER_LINE_COUNT),
            ));
        }
        header_lines.push(line);
    }

    let data_types = parse_data_type_header(&header_lines[DATA_TYPE_HEADER_LINE - 1]);
    let axes = parse_axis_header(&header_lines[AXIS_HEADER_LINE - 1]);

    // --- Data rows ---
    // Blank lines between data rows stay as rows of missing cells; trailing blank lines are dropped.
    let mut rows = Vec::new();
    let mut pending_blank: Vec<usize> = Vec::new();
    let mut line_number = FIRST_DATA_LINE;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).map_err(|e| ReformatError::io(path, e))?;
        if bytes == 0 {
            break;
        }
        let content = strip_line_ending(&line);
        if content.trim().is_empty() {
            pending_blank.push(line_number);
        } else {
            rows.extend(pending_blank.drain(..).map(|blank| TrialRow {
                line: blank,
                cells: StringRecord::from(vec![""]),
            }));
            rows.push(TrialRow {
                line: line_number,
                cells: split_data_line(content),
            });
        }
        line_number += 1;
    }

    debug!(
        "Read '{}': {} columns, {} data rows",
        path.display(),
        data_types.len(),
        rows.len()
    );

    Ok(TrialRecord {
        path: path.to_path_buf(),
        data_types,
        axes,
        rows,
    })
}
