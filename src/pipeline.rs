// src/pipeline.rs

//! Sequential run loop: one condition is read, extracted, transposed and written
//! before the next one starts. The combined files are produced last.

use std::io;
use std::path::PathBuf;

use log::{debug, info};

use crate::config::ReformatConfig;
use crate::data_analysis::extraction::{extract_subject, ConditionTables, ExtractionWarning};
use crate::data_input::demographics::{parse_demographics_file, DemographicsTable};
use crate::data_input::list_file::{parse_conditions_file, parse_samples_file};
use crate::data_input::trial_file::parse_trial_file;
use crate::data_output::concatenate::{concatenate_files, concatenation_order, ConcatenationReport};
use crate::data_output::csv_export::write_measurement_table;
use crate::error::{ReformatError, Result};
use crate::measurement_names::Measurement;
use crate::subject_context::SubjectContext;

/// What one condition produced.
#[derive(Debug, Clone)]
pub struct ConditionSummary {
    pub condition: String,
    pub subjects: Vec<String>,
    /// Timepoints per output table.
    pub rows: usize,
    pub outputs: Vec<PathBuf>,
    pub warnings: Vec<ExtractionWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub conditions: Vec<ConditionSummary>,
    pub concatenation: Vec<ConcatenationReport>,
}

impl RunSummary {
    pub fn warning_count(&self) -> usize {
        let extraction: usize = self.conditions.iter().map(|c| c.warnings.len()).sum();
        let truncations = self.concatenation.iter().filter(|r| r.truncated()).count();
        extraction + truncations
    }
}

/// Extracts every subject of `condition` and writes its five measurement tables.
pub fn process_condition(
    config: &ReformatConfig,
    demographics: &DemographicsTable,
    condition: &str,
) -> Result<ConditionSummary> {
    info!("--- Processing condition '{}' ---", condition);

    let samples = parse_samples_file(&config.samples_path(condition))?;
    let mut tables = ConditionTables::new(config.extraction.num_trials);
    let mut warnings = Vec::new();

    for subject in &samples {
        let subject_demographics = demographics.get(subject)?.clone();
        let ctx = SubjectContext::new(condition, subject.as_str(), subject_demographics, config.extraction.contralateral);

        let trial_path = config.trial_file_path(condition, subject);
        let record = parse_trial_file(&trial_path)?;
        debug!(
            "  {}: {} limb, {} rows from '{}'",
            subject,
            ctx.limb,
            record.row_count(),
            trial_path.display()
        );

        warnings.extend(extract_subject(&record, &ctx, &config.extraction, &mut tables)?);
    }

    let mut outputs = Vec::with_capacity(Measurement::ALL.len());
    let mut rows = 0;
    for table in tables.iter() {
        let output_path = config.output_path(condition, table.measurement());
        rows = write_measurement_table(&output_path, condition, table)?;
        outputs.push(output_path);
    }

    info!(
        "Finished '{}': {} subjects, {} rows per table, {} warnings.",
        condition,
        samples.len(),
        rows,
        warnings.len()
    );

    Ok(ConditionSummary {
        condition: condition.to_string(),
        subjects: samples,
        rows,
        outputs,
        warnings,
    })
}

/// Writes the combined file of every measurement from the already written per-condition files.
pub fn concatenate_conditions(config: &ReformatConfig, conditions: &[String]) -> Result<Vec<ConcatenationReport>> {
    info!("--- Concatenating conditions ---");
    let options = &config.concatenation;
    let order = concatenation_order(
        conditions,
        options.control_condition.as_deref(),
        options.duplicate_control,
    );
    debug!("Concatenation order: {:?}", order);

    Measurement::ALL
        .iter()
        .map(|&measurement| {
            let inputs: Vec<PathBuf> = order
                .iter()
                .map(|condition| config.output_path(condition, measurement))
                .collect();
            concatenate_files(
                &inputs,
                &config.combined_output_path(measurement),
                measurement,
                config.extraction.strictness,
            )
        })
        .collect()
}

/// Runs every condition in turn, then the optional concatenation pass.
pub fn run(config: &ReformatConfig) -> Result<RunSummary> {
    config.validate()?;

    if !config.input_dir.is_dir() {
        return Err(ReformatError::io(
            &config.input_dir,
            io::Error::new(io::ErrorKind::NotFound, "input directory not found"),
        ));
    }

    let demographics = parse_demographics_file(&config.demographics_path)?;
    if demographics.is_empty() {
        return Err(ReformatError::malformed(
            &config.demographics_path,
            1,
            "demographics table has no entries",
        ));
    }
    let control_last = if config.concatenation.duplicate_control {
        config.concatenation.control_condition.as_deref()
    } else {
        None
    };
    let conditions = parse_conditions_file(&config.conditions_path, control_last)?;
    info!(
        "{} conditions, {} demographics entries, {} trials per subject.",
        conditions.len(),
        demographics.len(),
        config.extraction.num_trials
    );

    let mut summary = RunSummary::default();
    for condition in &conditions {
        summary
            .conditions
            .push(process_condition(config, &demographics, condition)?);
    }

    if config.concatenation.enabled {
        summary.concatenation = concatenate_conditions(config, &conditions)?;
    }

    info!("Done with {} warnings.", summary.warning_count());
    Ok(summary)
}
