// src/lib.rs - Library interface for the reformatter

pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod data_output;
pub mod error;
pub mod measurement_names;
pub mod pipeline;
pub mod subject_context;
pub mod types;

pub use config::ReformatConfig;
pub use error::{ReformatError, Result};
pub use measurement_names::Measurement;
pub use pipeline::{run, RunSummary};
