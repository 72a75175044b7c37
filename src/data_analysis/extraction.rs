// src/data_analysis/extraction.rs

//! Trial extraction and normalization.
//!
//! Each subject contributes `num_trials` slots to every measurement table. Slots are filled
//! row by row from the trial file; the finished tables are transposed for export.

use std::fmt;

use log::warn;

use crate::config::{ExtractionOptions, Strictness};
use crate::data_analysis::column_resolver::{resolve, ColumnResolution};
use crate::data_analysis::transpose::columns_to_rows;
use crate::data_analysis::trial_selection::{select_trials, TrialSlots};
use crate::data_input::trial_file::{TrialRecord, TrialRow};
use crate::error::{ReformatError, Result};
use crate::measurement_names::{Measurement, MEASUREMENT_COUNT};
use crate::subject_context::SubjectContext;
use crate::types::{Cell, ColumnMajorTable, RowMajorTable};

/// Recoverable problem found while extracting one subject.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionWarning {
    InsufficientTrials {
        condition: String,
        subject: String,
        measurement: Measurement,
        found: usize,
        expected: usize,
    },
    /// `trial` and `column` are 1-based; `row` is the 1-based line in the trial file.
    MissingCell {
        condition: String,
        subject: String,
        measurement: Measurement,
        trial: usize,
        row: usize,
        column: usize,
    },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::InsufficientTrials {
                condition,
                subject,
                measurement,
                found,
                expected,
            } => write!(
                f,
                "Insufficient trials for {} {} {}. {} present, {} expected. Missing trials added and filled with NAs.",
                condition, subject, measurement, found, expected
            ),
            ExtractionWarning::MissingCell {
                condition,
                subject,
                measurement,
                trial,
                row,
                column,
            } => write!(
                f,
                "missing data in {} {} {} column #{} (csv row,column: {},{}). This cell is filled with an \"NA\" in the output.",
                condition, subject, measurement, trial, row, column
            ),
        }
    }
}

/// Column-major accumulation of one measurement across all subjects of a condition.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    measurement: Measurement,
    num_trials: usize,
    subjects: Vec<String>,
    slots: ColumnMajorTable,
}

impl MeasurementTable {
    pub fn new(measurement: Measurement, num_trials: usize) -> Self {
        Self {
            measurement,
            num_trials,
            subjects: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Opens `num_trials` empty slots for `subject` and returns the index of the first one.
    pub fn begin_subject(&mut self, subject: &str) -> usize {
        let base = self.subjects.len() * self.num_trials;
        self.subjects.push(subject.to_string());
        self.slots
            .extend(std::iter::repeat_with(Vec::new).take(self.num_trials));
        base
    }

    pub fn push(&mut self, slot: usize, value: Cell) {
        self.slots[slot].push(value);
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn slots(&self) -> &ColumnMajorTable {
        &self.slots
    }

    /// Row-major view: rows = timepoints, columns = subject × trial slots.
    pub fn to_rows(&self) -> Result<RowMajorTable> {
        columns_to_rows(&self.slots)
    }
}

/// The five measurement tables of one condition.
#[derive(Debug, Clone)]
pub struct ConditionTables {
    tables: Vec<MeasurementTable>,
}

impl ConditionTables {
    pub fn new(num_trials: usize) -> Self {
        Self {
            tables: Measurement::ALL
                .iter()
                .map(|&m| MeasurementTable::new(m, num_trials))
                .collect(),
        }
    }

    pub fn get(&self, measurement: Measurement) -> &MeasurementTable {
        &self.tables[measurement.index()]
    }

    pub fn get_mut(&mut self, measurement: Measurement) -> &mut MeasurementTable {
        &mut self.tables[measurement.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasurementTable> {
        self.tables.iter()
    }
}

/// Per-measurement extraction plan for one subject.
struct MeasurementPlan {
    measurement: Measurement,
    slots: TrialSlots,
    denominator: f64,
    /// -1.0 for inverted fields
    sign: f64,
    base_slot: usize,
}

/// Appends one subject's trials to every measurement table.
///
/// Returns the warnings raised along the way. In strict mode the first insufficient trial
/// count or missing cell is returned as an error instead.
pub fn extract_subject(
    record: &TrialRecord,
    ctx: &SubjectContext,
    options: &ExtractionOptions,
    tables: &mut ConditionTables,
) -> Result<Vec<ExtractionWarning>> {
    let mut warnings = Vec::new();

    // --- Column resolution and trial selection ---
    let mut plans: Vec<MeasurementPlan> = Vec::with_capacity(MEASUREMENT_COUNT);
    for measurement in Measurement::ALL {
        let ColumnResolution { columns, invert, .. } = resolve(
            measurement,
            ctx.limb,
            &record.data_types,
            &record.axes,
            options.downgrade,
            options.vgrf_source,
        );
        let slots = select_trials(&columns, options.num_trials, options.trial_selection);

        if slots.is_short() {
            if options.strictness == Strictness::Strict {
                return Err(ReformatError::InsufficientTrials {
                    condition: ctx.condition.clone(),
                    subject: ctx.subject.clone(),
                    measurement,
                    found: slots.found,
                    expected: options.num_trials,
                });
            }
            let warning = ExtractionWarning::InsufficientTrials {
                condition: ctx.condition.clone(),
                subject: ctx.subject.clone(),
                measurement,
                found: slots.found,
                expected: options.num_trials,
            };
            warn!("{}", warning);
            warnings.push(warning);
        }

        plans.push(MeasurementPlan {
            measurement,
            slots,
            denominator: ctx.denominator(measurement),
            sign: if invert { -1.0 } else { 1.0 },
            base_slot: 0,
        });
    }

    for plan in plans.iter_mut() {
        plan.base_slot = tables.get_mut(plan.measurement).begin_subject(&ctx.subject);
    }

    // --- Data rows ---
    for row in &record.rows {
        for plan in &plans {
            let table = tables.get_mut(plan.measurement);
            for (trial_index, source_column) in plan.slots.columns.iter().enumerate() {
                let slot = plan.base_slot + trial_index;
                let value = match source_column {
                    Some(column) => {
                        extract_cell(record, row, *column, trial_index, plan, ctx, options, &mut warnings)?
                    }
                    None => None,
                };
                table.push(slot, value);
            }
        }
    }

    Ok(warnings)
}

#[allow(clippy::too_many_arguments)]
fn extract_cell(
    record: &TrialRecord,
    row: &TrialRow,
    column: usize,
    trial_index: usize,
    plan: &MeasurementPlan,
    ctx: &SubjectContext,
    options: &ExtractionOptions,
    warnings: &mut Vec<ExtractionWarning>,
) -> Result<Cell> {
    let raw = row.cell(column).map(str::trim).unwrap_or("");
    if !raw.is_empty() {
        let parsed = raw.parse::<f64>().map_err(|_| {
            ReformatError::malformed(
                &record.path,
                row.line,
                format!("invalid number '{}' in column {}", raw, column + 1),
            )
        })?;
        return Ok(Some(parsed / plan.denominator * plan.sign));
    }

    if options.strictness == Strictness::Strict {
        return Err(ReformatError::MissingCell {
            condition: ctx.condition.clone(),
            subject: ctx.subject.clone(),
            measurement: plan.measurement,
            trial: trial_index + 1,
            row: row.line,
            column: column + 1,
        });
    }

    let warning = ExtractionWarning::MissingCell {
        condition: ctx.condition.clone(),
        subject: ctx.subject.clone(),
        measurement: plan.measurement,
        trial: trial_index + 1,
        row: row.line,
        column: column + 1,
    };
    warn!("{}", warning);
    warnings.push(warning);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, TrialSelection};
    use crate::data_input::demographics::Demographics;
    use crate::types::Limb;
    use approx::assert_relative_eq;
    use csv::StringRecord;
    use std::path::PathBuf;

    fn record(data_types: &[&str], axes: &[&str], rows: &[&[&str]]) -> TrialRecord {
        TrialRecord {
            path: PathBuf::from("S1_control_normalized.txt"),
            data_types: data_types.iter().map(|s| s.to_string()).collect(),
            axes: axes.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, cells)| TrialRow {
                    line: i + 6,
                    cells: StringRecord::from(cells.to_vec()),
                })
                .collect(),
        }
    }

    fn context(limb: Limb) -> SubjectContext {
        SubjectContext::new(
            "control",
            "S1",
            Demographics {
                height_cm: 170.0,
                mass_kg: 70.0,
                involved_limb: limb,
            },
            false,
        )
    }

    fn knee_trials_record() -> TrialRecord {
        record(
            &["FP1", "FP1", "RIGHTKNEEANGLE", "LEFTKNEEANGLE"],
            &["Z", "Z", "Y", "Y"],
            &[&["700", "710", "10", "20"]],
        )
    }

    #[test]
    fn test_vgrf_normalized_by_mass() {
        let options = Preset::Original.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        extract_subject(&knee_trials_record(), &context(Limb::Right), &options, &mut tables).unwrap();

        let rows = tables.get(Measurement::Vgrf).to_rows().unwrap();
        assert_eq!(rows.dim(), (1, 2));
        assert_relative_eq!(rows[[0, 0]].unwrap(), 10.0);
        assert_relative_eq!(rows[[0, 1]].unwrap(), 710.0 / 70.0);
    }

    #[test]
    fn test_short_trials_padded_with_warning() {
        let options = Preset::Original.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        let warnings = extract_subject(&knee_trials_record(), &context(Limb::Right), &options, &mut tables).unwrap();

        let rows = tables.get(Measurement::SagAng).to_rows().unwrap();
        assert_eq!(rows[[0, 0]], Some(10.0));
        assert_eq!(rows[[0, 1]], None);

        assert!(warnings.contains(&ExtractionWarning::InsufficientTrials {
            condition: "control".to_string(),
            subject: "S1".to_string(),
            measurement: Measurement::SagAng,
            found: 1,
            expected: 2,
        }));
        // no frontal or moment columns at all
        let frontmom = tables.get(Measurement::FrontMom).to_rows().unwrap();
        assert_eq!(frontmom.iter().filter(|c| c.is_none()).count(), 2);
    }

    #[test]
    fn test_strict_mode_rejects_short_trials() {
        let options = Preset::Strict.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        let err = extract_subject(&knee_trials_record(), &context(Limb::Right), &options, &mut tables).unwrap_err();
        assert!(matches!(
            err,
            ReformatError::InsufficientTrials { measurement: Measurement::SagAng, found: 1, expected: 2, .. }
        ));
    }

    #[test]
    fn test_moment_normalization_and_inversion() {
        let rec = record(
            &["LEFTKNEEMOMENT", "LEFTKNEEMOMENT", "LEFTKNEEANGLE", "LEFTKNEEANGLE"],
            &["Y", "X", "X", "Y"],
            &[&["1190", "2380", "5", "7"], &["-1190", "0", "-5", "8"]],
        );
        let options = Preset::Original.extraction_options(1);
        let mut tables = ConditionTables::new(1);
        extract_subject(&rec, &context(Limb::Left), &options, &mut tables).unwrap();

        let sagmom = tables.get(Measurement::SagMom).to_rows().unwrap();
        assert_relative_eq!(sagmom[[0, 0]].unwrap(), 0.1);
        assert_relative_eq!(sagmom[[1, 0]].unwrap(), -0.1);

        // left frontal fields are inverted on level ground
        let frontmom = tables.get(Measurement::FrontMom).to_rows().unwrap();
        assert_relative_eq!(frontmom[[0, 0]].unwrap(), -0.2);
        let frontang = tables.get(Measurement::FrontAng).to_rows().unwrap();
        assert_relative_eq!(frontang[[0, 0]].unwrap(), -5.0);
        assert_relative_eq!(frontang[[1, 0]].unwrap(), 5.0);

        let sagang = tables.get(Measurement::SagAng).to_rows().unwrap();
        assert_eq!(sagang[[0, 0]], Some(7.0));
        assert_eq!(sagang[[1, 0]], Some(8.0));
    }

    #[test]
    fn test_downgrade_inverts_right_side() {
        let rec = record(&["RIGHTKNEEANGLE"], &["X"], &[&["4"]]);
        let mut options = Preset::Downhill.extraction_options(1);
        let mut tables = ConditionTables::new(1);
        extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap();
        assert_eq!(tables.get(Measurement::FrontAng).to_rows().unwrap()[[0, 0]], Some(-4.0));

        options.downgrade = false;
        let mut tables = ConditionTables::new(1);
        extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap();
        assert_eq!(tables.get(Measurement::FrontAng).to_rows().unwrap()[[0, 0]], Some(4.0));
    }

    #[test]
    fn test_missing_cell_becomes_marker() {
        let rec = record(&["FP1", "FP1"], &["Z", "Z"], &[&["700", ""], &["", "140"]]);
        let options = Preset::Original.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        let warnings = extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap();

        let vgrf = tables.get(Measurement::Vgrf).to_rows().unwrap();
        assert_eq!(vgrf[[0, 0]], Some(10.0));
        assert_eq!(vgrf[[0, 1]], None);
        assert_eq!(vgrf[[1, 0]], None);
        assert_eq!(vgrf[[1, 1]], Some(2.0));

        let missing: Vec<_> = warnings
            .iter()
            .filter_map(|w| match w {
                ExtractionWarning::MissingCell { trial, row, column, .. } => Some((*trial, *row, *column)),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec![(2, 6, 2), (1, 7, 1)]);
    }

    #[test]
    fn test_short_row_counts_as_missing() {
        let rec = record(&["FP1", "FP1"], &["Z", "Z"], &[&["700"]]);
        let options = Preset::Original.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        let warnings = extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap();
        assert_eq!(tables.get(Measurement::Vgrf).to_rows().unwrap()[[0, 1]], None);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ExtractionWarning::MissingCell { column: 2, .. })));
    }

    #[test]
    fn test_strict_mode_rejects_missing_cell() {
        let rec = record(
            &["FP1", "RIGHTKNEEANGLE", "RIGHTKNEEANGLE", "RIGHTKNEEMOMENT", "RIGHTKNEEMOMENT"],
            &["Z", "Y", "X", "Y", "X"],
            &[&["", "1", "2", "3", "4"]],
        );
        let options = Preset::Strict.extraction_options(1);
        let mut tables = ConditionTables::new(1);
        let err = extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap_err();
        assert!(matches!(
            err,
            ReformatError::MissingCell { measurement: Measurement::Vgrf, trial: 1, row: 6, column: 1, .. }
        ));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let rec = record(&["FP1"], &["Z"], &[&["abc"]]);
        let options = Preset::Original.extraction_options(1);
        let mut tables = ConditionTables::new(1);
        let err = extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap_err();
        assert!(matches!(err, ReformatError::MalformedInput { line: 6, .. }));
    }

    #[test]
    fn test_last_trials_selection() {
        let rec = record(&["FP1", "FP1", "FP1"], &["Z", "Z", "Z"], &[&["70", "140", "210"]]);
        let mut options = Preset::Original.extraction_options(2);
        options.trial_selection = TrialSelection::Last;
        let mut tables = ConditionTables::new(2);
        extract_subject(&rec, &context(Limb::Right), &options, &mut tables).unwrap();
        let vgrf = tables.get(Measurement::Vgrf).to_rows().unwrap();
        assert_eq!(vgrf.row(0).to_vec(), vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_subjects_appended_in_order() {
        let options = Preset::Original.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        extract_subject(&knee_trials_record(), &context(Limb::Right), &options, &mut tables).unwrap();

        let mut second = context(Limb::Left);
        second.subject = "S2".to_string();
        let rec = record(&["FP2", "FP2"], &["Z", "Z"], &[&["350", "420"]]);
        extract_subject(&rec, &second, &options, &mut tables).unwrap();

        let vgrf = tables.get(Measurement::Vgrf);
        assert_eq!(vgrf.subjects(), &["S1".to_string(), "S2".to_string()]);
        let rows = vgrf.to_rows().unwrap();
        assert_eq!(rows.dim(), (1, 4));
        assert_eq!(rows[[0, 2]], Some(5.0));
        assert_eq!(rows[[0, 3]], Some(6.0));
    }

    #[test]
    fn test_unequal_row_counts_fail_on_transpose() {
        let options = Preset::Original.extraction_options(2);
        let mut tables = ConditionTables::new(2);
        extract_subject(&knee_trials_record(), &context(Limb::Right), &options, &mut tables).unwrap();
        let longer = record(
            &["FP1", "FP1", "RIGHTKNEEANGLE", "LEFTKNEEANGLE"],
            &["Z", "Z", "Y", "Y"],
            &[&["700", "710", "10", "20"], &["700", "710", "10", "20"]],
        );
        extract_subject(&longer, &context(Limb::Right), &options, &mut tables).unwrap();
        assert!(matches!(
            tables.get(Measurement::Vgrf).to_rows(),
            Err(ReformatError::UnevenTable { .. })
        ));
    }

    #[test]
    fn test_warning_messages() {
        let warning = ExtractionWarning::MissingCell {
            condition: "control".to_string(),
            subject: "S1".to_string(),
            measurement: Measurement::Vgrf,
            trial: 2,
            row: 6,
            column: 2,
        };
        assert_eq!(
            warning.to_string(),
            "missing data in control S1 vgrf column #2 (csv row,column: 6,2). This cell is filled with an \"NA\" in the output."
        );
    }
}
