//! Command-line host for the nomenclator engine.
//!
//! Reads point tables from CSV, runs the street aggregation on a background
//! worker and writes the resulting index back as CSV.

pub mod cli;
mod commands;
mod error;
pub mod table_io;
pub mod worker;

pub use self::{
    cli::{AnnotateArgs, Cli, Command, IndexArgs, PointArgs},
    commands::run,
    error::AppError,
};
