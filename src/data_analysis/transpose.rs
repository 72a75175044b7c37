// src/data_analysis/transpose.rs

use ndarray::Array2;

use crate::error::{ReformatError, Result};

/// Checks that every slot has the same length and returns that length.
fn common_length<T>(slots: &[Vec<T>]) -> Result<usize> {
    let expected = slots.first().map_or(0, Vec::len);
    for (slot, entries) in slots.iter().enumerate().skip(1) {
        if entries.len() != expected {
            return Err(ReformatError::UnevenTable {
                slot,
                found: entries.len(),
                expected,
            });
        }
    }
    Ok(expected)
}

/// Turns column-major slots into a row-major matrix.
///
/// Element `[r, c]` of the result is `slots[c][r]`. An empty slot list yields a 0×0 matrix.
/// Slots of different lengths are an internal consistency error.
pub fn columns_to_rows<T: Clone>(slots: &[Vec<T>]) -> Result<Array2<T>> {
    let rows = common_length(slots)?;
    let cols = slots.len();
    Ok(Array2::from_shape_fn((rows, cols), |(r, c)| slots[c][r].clone()))
}

/// Transposes a nested row list (R × C → C × R), rejecting ragged input.
pub fn transpose<T: Clone>(rows: &[Vec<T>]) -> Result<Vec<Vec<T>>> {
    let matrix = columns_to_rows(rows)?;
    Ok(matrix.outer_iter().map(|row| row.to_vec()).collect())
}
