// src/data_analysis/column_resolver.rs

use crate::config::VgrfSource;
use crate::constants::{
    FIELD_FP1, FIELD_FP2, FIELD_FP3, FIELD_LEFT_KNEE_ANGLE, FIELD_LEFT_KNEE_MOMENT, FIELD_RIGHT_KNEE_ANGLE,
    FIELD_RIGHT_KNEE_MOMENT,
};
use crate::measurement_names::Measurement;
use crate::types::Limb;

/// Which header columns hold a measurement for one subject, and whether their sign is flipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResolution {
    pub field: &'static str,
    pub axis: &'static str,
    /// Matching column indices, ascending (left-to-right trial order).
    pub columns: Vec<usize>,
    pub invert: bool,
}

/// Header field name (line 2) carrying `measurement` for `limb`.
pub fn field_name(measurement: Measurement, limb: Limb, vgrf_source: VgrfSource) -> &'static str {
    match (measurement, limb) {
        (Measurement::Vgrf, Limb::Right) => match vgrf_source {
            VgrfSource::Treadmill => FIELD_FP1,
            VgrfSource::Overground => FIELD_FP3,
        },
        (Measurement::Vgrf, Limb::Left) => FIELD_FP2,
        (Measurement::SagAng | Measurement::FrontAng, Limb::Right) => FIELD_RIGHT_KNEE_ANGLE,
        (Measurement::SagAng | Measurement::FrontAng, Limb::Left) => FIELD_LEFT_KNEE_ANGLE,
        (Measurement::SagMom | Measurement::FrontMom, Limb::Right) => FIELD_RIGHT_KNEE_MOMENT,
        (Measurement::SagMom | Measurement::FrontMom, Limb::Left) => FIELD_LEFT_KNEE_MOMENT,
    }
}

/// Sign inversion for frontal-plane measurements.
///
/// Level/uphill trials flip the left-side field; downhill trials flip the right-side field.
/// Sagittal and vGRF measurements are never inverted.
pub fn should_invert(measurement: Measurement, field: &str, downgrade: bool) -> bool {
    let (right_field, left_field) = match measurement {
        Measurement::FrontAng => (FIELD_RIGHT_KNEE_ANGLE, FIELD_LEFT_KNEE_ANGLE),
        Measurement::FrontMom => (FIELD_RIGHT_KNEE_MOMENT, FIELD_LEFT_KNEE_MOMENT),
        _ => return false,
    };
    (!downgrade && field == left_field) || (downgrade && field == right_field)
}

/// Indices of columns whose data type equals `field` and whose axis equals `axis`.
///
/// The two header rows are zipped, so a column missing from either row never matches.
pub fn matching_columns(field: &str, axis: &str, data_types: &[String], axes: &[String]) -> Vec<usize> {
    data_types
        .iter()
        .zip(axes.iter())
        .enumerate()
        .filter(|(_, (data_type, axis_label))| data_type.as_str() == field && axis_label.as_str() == axis)
        .map(|(index, _)| index)
        .collect()
}

/// Resolves the source columns and inversion flag for one measurement of one subject.
pub fn resolve(
    measurement: Measurement,
    limb: Limb,
    data_types: &[String],
    axes: &[String],
    downgrade: bool,
    vgrf_source: VgrfSource,
) -> ColumnResolution {
    let field = field_name(measurement, limb, vgrf_source);
    let axis = measurement.axis_label();
    ColumnResolution {
        field,
        axis,
        columns: matching_columns(field, axis, data_types, axes),
        invert: should_invert(measurement, field, downgrade),
    }
}
