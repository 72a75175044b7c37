// src/data_input/list_file.rs

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ReformatError, Result};

/// Reads a one-entry-per-line list file. Entries are trimmed; blank lines are skipped.
pub fn parse_list_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| ReformatError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line_result in reader.lines() {
        let line = line_result.map_err(|e| ReformatError::io(path, e))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            entries.push(trimmed.to_string());
        }
    }
    Ok(entries)
}

/// Fails on the first entry that appears twice.
pub fn ensure_unique(entries: &[String], path: &Path) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.as_str()) {
            return Err(ReformatError::DuplicateEntry {
                path: path.to_path_buf(),
                entry: entry.clone(),
            });
        }
    }
    Ok(())
}

/// Numeric part of a subject id such as "S12" (everything after the first character).
pub fn subject_sort_key(subject: &str) -> Option<u64> {
    let mut chars = subject.chars();
    chars.next()?;
    chars.as_str().parse::<u64>().ok()
}

/// Parses a samples list: unique subject ids sorted by their numeric suffix.
pub fn parse_samples_file(path: &Path) -> Result<Vec<String>> {
    let samples = parse_list_file(path)?;
    if samples.is_empty() {
        return Err(ReformatError::malformed(path, 1, "samples list is empty"));
    }
    ensure_unique(&samples, path)?;

    let mut keyed = Vec::with_capacity(samples.len());
    for (i, sample) in samples.into_iter().enumerate() {
        let key = subject_sort_key(&sample).ok_or_else(|| {
            ReformatError::malformed(
                path,
                i + 1,
                format!("subject id '{}' has no numeric suffix after its first character", sample),
            )
        })?;
        keyed.push((key, sample));
    }
    keyed.sort_by_key(|(key, _)| *key);

    Ok(keyed.into_iter().map(|(_, sample)| sample).collect())
}

/// Parses the conditions list. When `control_last` names a condition it is moved to the end;
/// its absence is an error.
pub fn parse_conditions_file(path: &Path, control_last: Option<&str>) -> Result<Vec<String>> {
    let mut conditions = parse_list_file(path)?;
    ensure_unique(&conditions, path)?;

    if let Some(control) = control_last {
        let position = conditions
            .iter()
            .position(|c| c == control)
            .ok_or_else(|| ReformatError::MissingControlCondition(control.to_string()))?;
        let control_entry = conditions.remove(position);
        conditions.push(control_entry);
    }
    Ok(conditions)
}
