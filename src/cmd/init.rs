//! Init command - create a journal pre-filled with the demo season

use crate::cmd::write_journal;
use crate::core::{seed, Journal};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitCommand {
    /// Journal file to create (.json or .csv)
    #[arg(short, long)]
    journal: PathBuf,

    /// Start from an empty journal instead of the demo entries
    #[arg(long)]
    empty: bool,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.journal.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.journal.display()
            );
        }

        let journal = if self.empty {
            Journal::new()
        } else {
            seed::seeded()?
        };
        write_journal(&journal, &self.journal)?;

        log::info!("Journal digest {}", journal.digest());
        println!(
            "Created {} with {} entries",
            self.journal.display(),
            journal.len()
        );
        Ok(())
    }
}
