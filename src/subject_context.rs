// src/subject_context.rs

use crate::data_input::demographics::Demographics;
use crate::measurement_names::{Measurement, Normalization};
use crate::types::Limb;

/// Context for extracting one subject's trials under one condition.
/// Carries the identifiers used in diagnostics and the limb/normalization inputs.
#[derive(Debug, Clone)]
pub struct SubjectContext {
    pub condition: String,
    pub subject: String,
    pub demographics: Demographics,

    /// Limb whose columns are extracted (the involved limb, or its opposite in contralateral mode)
    pub limb: Limb,
}

impl SubjectContext {
    pub fn new(
        condition: impl Into<String>,
        subject: impl Into<String>,
        demographics: Demographics,
        contralateral: bool,
    ) -> Self {
        let limb = if contralateral {
            demographics.involved_limb.contralateral()
        } else {
            demographics.involved_limb
        };
        Self {
            condition: condition.into(),
            subject: subject.into(),
            demographics,
            limb,
        }
    }

    /// Divisor applied to every raw value of `measurement`.
    pub fn denominator(&self, measurement: Measurement) -> f64 {
        match measurement.normalization() {
            Normalization::None => 1.0,
            Normalization::Mass => self.demographics.mass_kg,
            Normalization::MassTimesHeight => self.demographics.mass_kg * self.demographics.height_cm,
        }
    }
}
