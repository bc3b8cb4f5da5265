//! CLI command handlers

pub mod commands;

pub use commands::{chart, run, validate};
