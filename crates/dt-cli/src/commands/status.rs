//! Status command for showing store and recovery state.

use std::io::Write;

use anyhow::Result;

use dt_store::Journal;

use crate::Config;
use crate::commands::util::{load_names, open_store, summary_line, territory_label};

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let journal = Journal::open(&config.data_dir);
    let names = load_names(config);

    writeln!(writer, "Duty tracker status")?;
    writeln!(writer, "Store: {}", store.data_path().display())?;
    writeln!(writer, "Sessions: {}", store.len())?;

    if let Some(last) = store.last() {
        writeln!(writer, "Last: {}", summary_line(&names, &last))?;
    }

    if journal.is_dirty() {
        match journal.load_in_progress() {
            Some(session) => writeln!(
                writer,
                "Pending recovery: {}",
                territory_label(&names, session.territory_id)
            )?,
            None => writeln!(writer, "Pending recovery: unreadable journal")?,
        }
    }

    Ok(())
}
