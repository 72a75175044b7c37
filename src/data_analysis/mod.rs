// src/data_analysis/mod.rs

pub mod column_resolver;
pub mod extraction;
pub mod transpose;
pub mod trial_selection;

// src/data_analysis/mod.rs
