// src/data_input/demographics.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;

use crate::constants::{DEM_COL_HEIGHT, DEM_COL_INVOLVED_LIMB, DEM_COL_MASS, DEM_COL_SUBJECT};
use crate::error::{ReformatError, Result};
use crate::types::Limb;

/// Per-subject anthropometrics needed for normalization and limb selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    pub height_cm: f64,
    pub mass_kg: f64,
    pub involved_limb: Limb,
}

/// Demographics keyed by subject id.
#[derive(Debug, Clone, Default)]
pub struct DemographicsTable {
    entries: HashMap<String, Demographics>,
}

impl DemographicsTable {
    pub fn get(&self, subject: &str) -> Result<&Demographics> {
        self.entries
            .get(subject)
            .ok_or_else(|| ReformatError::MissingDemographics(subject.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, subject: impl Into<String>, demographics: Demographics) {
        self.entries.insert(subject.into(), demographics);
    }
}

/// Parses the comma-separated demographics table.
///
/// The first line is a header and is skipped. Columns used:
/// subject (1), height in cm (4), mass in kg (5), involved limb code (7, 0 = right, 1 = left).
pub fn parse_demographics_file(path: &Path) -> Result<DemographicsTable> {
    let content = fs::read_to_string(path).map_err(|e| ReformatError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut table = DemographicsTable::default();
    for (row_index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|pos| record_start_line(&content, pos.byte() as usize))
            .unwrap_or(row_index + 2);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let subject = field(&record, DEM_COL_SUBJECT, "subject", path, line)?.to_string();
        let height_cm = parse_number::<f64>(&record, DEM_COL_HEIGHT, "height", path, line)?;
        let mass_kg = parse_number::<f64>(&record, DEM_COL_MASS, "mass", path, line)?;
        let limb_code = parse_number::<i64>(&record, DEM_COL_INVOLVED_LIMB, "involved limb", path, line)?;
        let involved_limb = Limb::from_code(limb_code).ok_or_else(|| {
            ReformatError::malformed(
                path,
                line,
                format!("involved limb code must be 0 (right) or 1 (left), got {}", limb_code),
            )
        })?;

        table.insert(
            subject,
            Demographics {
                height_cm,
                mass_kg,
                involved_limb,
            },
        );
    }

    debug!("Parsed {} demographics entries from '{}'", table.len(), path.display());
    Ok(table)
}

/// 1-based line of the record that starts at `byte`.
///
/// A record position points just past the previous record, before any skipped blank lines,
/// so those are stepped over first.
fn record_start_line(content: &str, byte: usize) -> usize {
    let bytes = content.as_bytes();
    let mut start = byte.min(bytes.len());
    while start < bytes.len() && matches!(bytes[start], b'\n' | b'\r') {
        start += 1;
    }
    bytes[..start].iter().filter(|&&b| b == b'\n').count() + 1
}

fn field<'a>(record: &'a StringRecord, col: usize, name: &str, path: &Path, line: usize) -> Result<&'a str> {
    record
        .get(col)
        .ok_or_else(|| ReformatError::malformed(path, line, format!("missing {} column", name)))
}

fn parse_number<T: std::str::FromStr>(
    record: &StringRecord,
    col: usize,
    name: &str,
    path: &Path,
    line: usize,
) -> Result<T> {
    let value = field(record, col, name, path, line)?;
    value
        .parse::<T>()
        .map_err(|_| ReformatError::malformed(path, line, format!("invalid {} value '{}'", name, value)))
}
