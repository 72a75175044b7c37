// src/main.rs

use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use biomech_reformat::config::{
    ConcatenationOptions, InputLayout, Preset, ReformatConfig, SamplesSource, Strictness, TrialSelection, VgrfSource,
};
use biomech_reformat::constants::{DEFAULT_NUM_TRIALS, DEFAULT_OUTPUT_SUFFIX};

#[derive(Parser, Debug)]
#[command(name = "biomech-reformat")]
#[command(version)]
#[command(
    about = "Reformat motion-capture trial exports into normalized per-measurement CSV tables",
    long_about = None
)]
struct Cli {
    /// Demographics table (comma-separated, one header line)
    #[arg(short, long)]
    demographics: PathBuf,

    /// Samples list shared by every condition
    #[arg(short, long, required_unless_present = "samples_prefix", conflicts_with = "samples_prefix")]
    samples: Option<PathBuf>,

    /// Per-condition samples lists: {samples_prefix}{condition}{samples_suffix}
    #[arg(long)]
    samples_prefix: Option<String>,

    #[arg(long, default_value = ".txt")]
    samples_suffix: String,

    /// Conditions list, one label per line
    #[arg(short, long)]
    conditions: PathBuf,

    /// Root directory holding one subdirectory per condition
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Trial files sit directly in the condition directory (no per-subject subdirectory)
    #[arg(long)]
    flat_layout: bool,

    /// Output path prefix: {prefix}{condition}_{measurement}{suffix}
    #[arg(short, long, default_value = "")]
    output_prefix: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
    output_suffix: String,

    /// Number of trials kept per subject
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_TRIALS)]
    num_trials: usize,

    /// Keep the last N matching trials instead of the first N
    #[arg(long)]
    last_trials: bool,

    /// Base variant; the flags below can only switch further options on
    #[arg(long, default_value = "original")]
    preset: Preset,

    /// Extract the limb opposite the involved one
    #[arg(long)]
    contralateral: bool,

    /// vGRF for the right limb comes from force plate 3 (overground walkway)
    #[arg(long)]
    overground: bool,

    /// Downhill trials: invert the right-side frontal-plane fields instead of the left-side ones
    #[arg(long)]
    downhill: bool,

    /// Abort on missing cells, insufficient trials or ragged concatenation inputs
    #[arg(long)]
    strict: bool,

    /// Also write {prefix}all_{measurement}{suffix} joining every condition
    #[arg(long)]
    concatenate: bool,

    /// Control condition label (placed last when duplicated)
    #[arg(long)]
    control: Option<String>,

    /// Repeat the control condition once per non-control condition in the combined file
    #[arg(long, requires_all = ["control", "concatenate"])]
    duplicate_control: bool,
}

impl Cli {
    fn into_config(self) -> ReformatConfig {
        let mut extraction = self.preset.extraction_options(self.num_trials);
        if self.last_trials {
            extraction.trial_selection = TrialSelection::Last;
        }
        if self.contralateral {
            extraction.contralateral = true;
        }
        if self.overground {
            extraction.vgrf_source = VgrfSource::Overground;
        }
        if self.downhill {
            extraction.downgrade = true;
        }
        if self.strict {
            extraction.strictness = Strictness::Strict;
        }

        let samples = match (self.samples, self.samples_prefix) {
            (Some(path), _) => SamplesSource::Global(path),
            (None, Some(prefix)) => SamplesSource::PerCondition {
                prefix,
                suffix: self.samples_suffix,
            },
            // clap enforces one of the two
            (None, None) => SamplesSource::Global(PathBuf::new()),
        };

        ReformatConfig {
            demographics_path: self.demographics,
            samples,
            conditions_path: self.conditions,
            input_dir: self.input_dir,
            input_layout: if self.flat_layout {
                InputLayout::Flat
            } else {
                InputLayout::Nested
            },
            output_prefix: self.output_prefix,
            output_suffix: self.output_suffix,
            extraction,
            concatenation: ConcatenationOptions {
                enabled: self.concatenate,
                duplicate_control: self.duplicate_control,
                control_condition: self.control,
            },
        }
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config();
    let summary = biomech_reformat::run(&config).context("reformatting failed")?;

    for condition in &summary.conditions {
        info!(
            "  {}: {} subjects, {} rows, {} files written",
            condition.condition,
            condition.subjects.len(),
            condition.rows,
            condition.outputs.len()
        );
    }
    for report in &summary.concatenation {
        info!("  {}: {} lines", report.output.display(), report.rows_written);
    }
    Ok(())
}

fn main() {
    init_logging();

    // Usage errors exit with 1 like every other fatal error.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = run_cli(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}
