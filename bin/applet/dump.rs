use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use derive_more::Constructor;
use lib::chess::Game;
use std::path::PathBuf;
use tracing::instrument;

/// Prints the positions a relay would send, one per line.
#[derive(Debug, Eq, PartialEq, Parser, Constructor)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Dump {
    /// Path to the game record in PGN.
    #[clap(default_value = "res/test.pgn")]
    pgn: PathBuf,
}

impl Dump {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let game = Game::open(&self.pgn)
            .with_context(|| format!("failed to load `{}`", self.pgn.display()))?;

        for fen in game.mainline() {
            println!("{}", fen);
        }

        Ok(())
    }
}
