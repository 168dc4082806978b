//! Driver for the `tsr` binary: configuration, argument parsing and the
//! `emit` / `query` commands.

pub mod args;
pub mod config;
pub mod driver;
pub mod tracing_config;
