// src/error.rs

//! Error types for the reformatter.

use std::path::PathBuf;

use thiserror::Error;

use crate::measurement_names::Measurement;

/// Every fatal condition the reformatter can hit.
///
/// Recoverable conditions (missing cells and short trial counts in lenient
/// mode) are reported as warnings and never reach this type.
#[derive(Error, Debug)]
pub enum ReformatError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed content in one of the input files.
    #[error("Malformed input '{}' (line {line}): {message}", path.display())]
    MalformedInput {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("No demographics entry for subject '{0}'")]
    MissingDemographics(String),

    #[error("Duplicate entry '{entry}' in '{}'", path.display())]
    DuplicateEntry { path: PathBuf, entry: String },

    #[error("Control condition '{0}' is not in the conditions list")]
    MissingControlCondition(String),

    #[error("Insufficient trials for {condition} {subject} {measurement}. {found} present, {expected} expected.")]
    InsufficientTrials {
        condition: String,
        subject: String,
        measurement: Measurement,
        found: usize,
        expected: usize,
    },

    #[error("Missing data in {condition} {subject} {measurement} trial #{trial} (row,column: {row},{column})")]
    MissingCell {
        condition: String,
        subject: String,
        measurement: Measurement,
        trial: usize,
        row: usize,
        column: usize,
    },

    /// Column-major table whose slots do not all have the same length.
    #[error("Uneven table: slot {slot} has {found} entries, expected {expected}")]
    UnevenTable {
        slot: usize,
        found: usize,
        expected: usize,
    },

    #[error("Concatenation inputs for '{measurement}' have unequal row counts: {counts:?}")]
    RaggedConcatenation {
        measurement: Measurement,
        counts: Vec<usize>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReformatError {
    /// Wraps an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReformatError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ReformatError::MalformedInput {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ReformatError::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ReformatError>;
