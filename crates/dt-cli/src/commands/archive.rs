//! Archive command: moves old sessions into an archive CSV.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use crate::Config;
use crate::commands::util::open_store;

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    /// Archive once the store holds this many sessions (defaults to config).
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Newest sessions to keep in the store (defaults to config).
    #[arg(long)]
    pub keep: Option<usize>,
}

pub fn run<W: Write>(writer: &mut W, args: &ArchiveArgs, config: &Config) -> Result<()> {
    let Some(threshold) = args.threshold.or(config.archive.threshold) else {
        writeln!(writer, "Archiving is disabled; set archive.threshold or pass --threshold")?;
        return Ok(());
    };
    let keep = args.keep.unwrap_or(config.archive.keep);

    let store = open_store(config)?;
    match store
        .archive(threshold, keep)
        .context("failed to archive sessions")?
    {
        Some(path) => writeln!(
            writer,
            "Archived to {} ({} sessions kept)",
            path.display(),
            store.len()
        )?,
        None => writeln!(
            writer,
            "Nothing to archive ({} of {threshold} sessions)",
            store.len()
        )?,
    }
    Ok(())
}
