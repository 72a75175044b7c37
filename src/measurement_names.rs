// src/measurement_names.rs

//! Centralized measurement naming and per-measurement rules
//!
//! Provides the five fixed measurement kinds and the naming, axis and
//! normalization rules attached to each.

use std::fmt;
use std::str::FromStr;

use crate::constants::{AXIS_X, AXIS_Y, AXIS_Z};

/// Number of measurement kinds produced per condition.
pub const MEASUREMENT_COUNT: usize = 5;

/// All measurement names in output order.
pub const MEASUREMENT_NAMES: [&str; MEASUREMENT_COUNT] =
    ["vgrf", "sagang", "frontang", "sagmom", "frontmom"];

/// One of the five extracted signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    /// Vertical ground reaction force
    Vgrf,
    /// Sagittal-plane knee angle
    SagAng,
    /// Frontal-plane knee angle
    FrontAng,
    /// Sagittal-plane knee moment
    SagMom,
    /// Frontal-plane knee moment
    FrontMom,
}

/// What a raw value is divided by before export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    None,
    Mass,
    MassTimesHeight,
}

impl Measurement {
    pub const ALL: [Measurement; MEASUREMENT_COUNT] = [
        Measurement::Vgrf,
        Measurement::SagAng,
        Measurement::FrontAng,
        Measurement::SagMom,
        Measurement::FrontMom,
    ];

    pub fn name(&self) -> &'static str {
        MEASUREMENT_NAMES[self.index()]
    }

    /// Position of this measurement in `Measurement::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Measurement::Vgrf => 0,
            Measurement::SagAng => 1,
            Measurement::FrontAng => 2,
            Measurement::SagMom => 3,
            Measurement::FrontMom => 4,
        }
    }

    /// Axis label the matching column must carry on header line 5.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Measurement::Vgrf => AXIS_Z,
            Measurement::SagAng | Measurement::SagMom => AXIS_Y,
            Measurement::FrontAng | Measurement::FrontMom => AXIS_X,
        }
    }

    pub fn normalization(&self) -> Normalization {
        match self {
            Measurement::Vgrf => Normalization::Mass,
            Measurement::SagMom | Measurement::FrontMom => Normalization::MassTimesHeight,
            Measurement::SagAng | Measurement::FrontAng => Normalization::None,
        }
    }

    /// Frontal-plane measurements are the only ones subject to sign inversion.
    pub fn is_frontal(&self) -> bool {
        matches!(self, Measurement::FrontAng | Measurement::FrontMom)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measurement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measurement::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid measurement '{}'. Expected one of: {}",
                    s,
                    MEASUREMENT_NAMES.join(", ")
                )
            })
    }
}
