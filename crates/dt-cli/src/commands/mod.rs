//! CLI subcommand implementations.

pub mod archive;
pub mod dedup;
pub mod export;
pub mod import;
pub mod list;
pub mod remove;
pub mod replay;
pub mod reset;
pub mod show;
pub mod stats;
pub mod status;
pub mod util;
