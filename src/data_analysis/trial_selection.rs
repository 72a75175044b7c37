// src/data_analysis/trial_selection.rs

use crate::config::TrialSelection;

/// Fixed-size list of source columns for one subject and measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSlots {
    /// Exactly `num_trials` entries; `None` marks a padded (absent) trial.
    pub columns: Vec<Option<usize>>,
    /// Number of matched columns before trimming or padding.
    pub found: usize,
}

impl TrialSlots {
    pub fn is_short(&self) -> bool {
        self.found < self.columns.len()
    }
}

/// Trims `matched` to `num_trials` columns (first-N or last-N) or pads it with `None`.
pub fn select_trials(matched: &[usize], num_trials: usize, selection: TrialSelection) -> TrialSlots {
    let found = matched.len();
    let kept: &[usize] = if found >= num_trials {
        match selection {
            TrialSelection::First => &matched[..num_trials],
            TrialSelection::Last => &matched[found - num_trials..],
        }
    } else {
        matched
    };

    let mut columns: Vec<Option<usize>> = kept.iter().copied().map(Some).collect();
    columns.resize(num_trials, None);

    TrialSlots { columns, found }
}
