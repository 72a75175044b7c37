// src/data_output/mod.rs

pub mod concatenate;
pub mod csv_export;

// src/data_output/mod.rs
