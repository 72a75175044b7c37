// src/types.rs
// Shared value types and table aliases

use std::fmt;

use ndarray::Array2;

/// One exported value; `None` is written as the missing-value marker.
pub type Cell = Option<f64>;

/// All timepoints of one subject × trial slot.
pub type TrialColumn = Vec<Cell>;

/// Column-major accumulation: one entry per subject × trial slot.
pub type ColumnMajorTable = Vec<TrialColumn>;

/// Row-major export table: rows = timepoints, columns = subject × trial slots.
pub type RowMajorTable = Array2<Cell>;

/// Limb code as stored in the demographics table (0 = right, 1 = left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limb {
    Right,
    Left,
}

impl Limb {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Limb::Right),
            1 => Some(Limb::Left),
            _ => None,
        }
    }

    pub fn contralateral(&self) -> Self {
        match self {
            Limb::Right => Limb::Left,
            Limb::Left => Limb::Right,
        }
    }
}

impl fmt::Display for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limb::Right => f.write_str("right"),
            Limb::Left => f.write_str("left"),
        }
    }
}
