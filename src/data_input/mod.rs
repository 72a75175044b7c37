// src/data_input/mod.rs

pub mod demographics;
pub mod list_file;
pub mod trial_file;

// src/data_input/mod.rs
