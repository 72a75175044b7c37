// src/config.rs

//! Run configuration.
//!
//! Every command-line option ends up in one immutable [`ReformatConfig`] that is
//! passed explicitly into the pipeline. The extraction core only ever sees the
//! [`ExtractionOptions`] part of it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{COMBINED_FILE_TAG, DEFAULT_NUM_TRIALS, TRIAL_FILE_SUFFIX};
use crate::error::{ReformatError, Result};
use crate::measurement_names::Measurement;

/// Which end of the matched trial columns is kept when there are too many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialSelection {
    #[default]
    First,
    Last,
}

/// Whether missing cells and short trial counts abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

/// Force plate layout the vGRF columns come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VgrfSource {
    #[default]
    Treadmill,
    Overground,
}

/// Where trial files live under the input root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// `{input}/{condition}/{subject}/{subject}_{condition}_normalized.txt`
    #[default]
    Nested,
    /// `{input}/{condition}/{subject}_{condition}_normalized.txt`
    Flat,
}

/// One samples list for every condition, or one list per condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplesSource {
    Global(PathBuf),
    /// `{prefix}{condition}{suffix}`
    PerCondition { prefix: String, suffix: String },
}

/// Options that drive column resolution and value extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub num_trials: usize,
    pub trial_selection: TrialSelection,
    pub strictness: Strictness,
    pub vgrf_source: VgrfSource,
    /// Downhill locomotion: frontal-plane inversion applies to the right side instead of the left.
    pub downgrade: bool,
    /// Extract the limb opposite the involved one.
    pub contralateral: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Preset::Original.extraction_options(DEFAULT_NUM_TRIALS)
    }
}

/// Named configurations matching the historical processing variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Original,
    Contralateral,
    Downhill,
    Overground,
    Strict,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Original,
        Preset::Contralateral,
        Preset::Downhill,
        Preset::Overground,
        Preset::Strict,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Original => "original",
            Preset::Contralateral => "contralateral",
            Preset::Downhill => "downhill",
            Preset::Overground => "overground",
            Preset::Strict => "strict",
        }
    }

    pub fn extraction_options(&self, num_trials: usize) -> ExtractionOptions {
        let mut options = ExtractionOptions {
            num_trials,
            trial_selection: TrialSelection::First,
            strictness: Strictness::Lenient,
            vgrf_source: VgrfSource::Treadmill,
            downgrade: false,
            contralateral: false,
        };
        match self {
            Preset::Original => {}
            Preset::Contralateral => options.contralateral = true,
            Preset::Downhill => options.downgrade = true,
            Preset::Overground => options.vgrf_source = VgrfSource::Overground,
            Preset::Strict => options.strictness = Strictness::Strict,
        }
        options
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("Unknown preset '{}'", s))
    }
}

/// Combined "all conditions" file settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConcatenationOptions {
    pub enabled: bool,
    /// Repeat the control condition once per non-control condition.
    pub duplicate_control: bool,
    pub control_condition: Option<String>,
}

/// Complete, validated run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReformatConfig {
    pub demographics_path: PathBuf,
    pub samples: SamplesSource,
    pub conditions_path: PathBuf,
    pub input_dir: PathBuf,
    pub input_layout: InputLayout,
    pub output_prefix: String,
    pub output_suffix: String,
    pub extraction: ExtractionOptions,
    pub concatenation: ConcatenationOptions,
}

impl ReformatConfig {
    /// Checks cross-option constraints that clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.num_trials == 0 {
            return Err(ReformatError::config("number of trials must be at least 1"));
        }
        let concat = &self.concatenation;
        if concat.duplicate_control {
            if !concat.enabled {
                return Err(ReformatError::config(
                    "control duplication requires concatenation to be enabled",
                ));
            }
            if concat.control_condition.is_none() {
                return Err(ReformatError::config(
                    "control duplication requires a control condition label",
                ));
            }
        }
        Ok(())
    }

    pub fn samples_path(&self, condition: &str) -> PathBuf {
        match &self.samples {
            SamplesSource::Global(path) => path.clone(),
            SamplesSource::PerCondition { prefix, suffix } => {
                PathBuf::from(format!("{}{}{}", prefix, condition, suffix))
            }
        }
    }

    pub fn trial_file_path(&self, condition: &str, subject: &str) -> PathBuf {
        let file_name = format!("{}_{}{}", subject, condition, TRIAL_FILE_SUFFIX);
        let condition_dir = self.input_dir.join(condition);
        match self.input_layout {
            InputLayout::Nested => condition_dir.join(subject).join(file_name),
            InputLayout::Flat => condition_dir.join(file_name),
        }
    }

    /// `{prefix}{condition}_{measurement}{suffix}`
    pub fn output_path(&self, condition: &str, measurement: Measurement) -> PathBuf {
        PathBuf::from(format!(
            "{}{}_{}{}",
            self.output_prefix, condition, measurement, self.output_suffix
        ))
    }

    /// `{prefix}all_{measurement}{suffix}`
    pub fn combined_output_path(&self, measurement: Measurement) -> PathBuf {
        self.output_path(COMBINED_FILE_TAG, measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ReformatConfig {
        ReformatConfig {
            demographics_path: PathBuf::from("dem.csv"),
            samples: SamplesSource::Global(PathBuf::from("samples.txt")),
            conditions_path: PathBuf::from("conditions.txt"),
            input_dir: PathBuf::from("in"),
            input_layout: InputLayout::Nested,
            output_prefix: "out/".to_string(),
            output_suffix: ".csv".to_string(),
            extraction: ExtractionOptions::default(),
            concatenation: ConcatenationOptions::default(),
        }
    }

    #[test]
    fn test_presets() {
        let original = Preset::Original.extraction_options(3);
        assert_eq!(original.num_trials, 3);
        assert_eq!(original.trial_selection, TrialSelection::First);
        assert_eq!(original.strictness, Strictness::Lenient);
        assert_eq!(original.vgrf_source, VgrfSource::Treadmill);
        assert!(!original.downgrade);
        assert!(!original.contralateral);

        assert!(Preset::Contralateral.extraction_options(3).contralateral);
        assert!(Preset::Downhill.extraction_options(3).downgrade);
        assert_eq!(
            Preset::Overground.extraction_options(3).vgrf_source,
            VgrfSource::Overground
        );
        assert_eq!(
            Preset::Strict.extraction_options(3).strictness,
            Strictness::Strict
        );
    }

    #[test]
    fn test_preset_from_str() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
        assert!("uphill".parse::<Preset>().is_err());
    }

    #[test]
    fn test_paths() {
        let mut config = base_config();
        assert_eq!(
            config.trial_file_path("control", "S1"),
            PathBuf::from("in/control/S1/S1_control_normalized.txt")
        );
        config.input_layout = InputLayout::Flat;
        assert_eq!(
            config.trial_file_path("control", "S1"),
            PathBuf::from("in/control/S1_control_normalized.txt")
        );
        assert_eq!(
            config.output_path("control", Measurement::Vgrf),
            PathBuf::from("out/control_vgrf.csv")
        );
        assert_eq!(
            config.combined_output_path(Measurement::FrontMom),
            PathBuf::from("out/all_frontmom.csv")
        );
    }

    #[test]
    fn test_samples_path() {
        let mut config = base_config();
        assert_eq!(config.samples_path("overload"), PathBuf::from("samples.txt"));
        config.samples = SamplesSource::PerCondition {
            prefix: "lists/samples_".to_string(),
            suffix: ".txt".to_string(),
        };
        assert_eq!(
            config.samples_path("overload"),
            PathBuf::from("lists/samples_overload.txt")
        );
    }

    #[test]
    fn test_validate() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        config.extraction.num_trials = 0;
        assert!(config.validate().is_err());
        config.extraction.num_trials = 2;

        config.concatenation.duplicate_control = true;
        assert!(config.validate().is_err());
        config.concatenation.enabled = true;
        assert!(config.validate().is_err());
        config.concatenation.control_condition = Some("control".to_string());
        assert!(config.validate().is_ok());
    }
}
