//! Duty tracker CLI library.
//!
//! This crate provides the `dtrack` command-line interface over the session
//! store and the tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{ArchiveConfig, Config};
