use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::chess::Game;
use lib::relay::{Options, Tcp};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Relays the positions of a game to a remote TCP server.
#[derive(Debug, Eq, PartialEq, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Relay {
    /// The relay configuration.
    #[clap(short, long, default_value_t)]
    options: Options,

    /// Path to the game record in PGN.
    #[clap(default_value = "res/test.pgn")]
    pgn: PathBuf,

    /// Address of the remote server.
    #[clap(default_value = "localhost:8888")]
    address: String,
}

impl Default for Relay {
    fn default() -> Self {
        Relay {
            options: Options::default(),
            pgn: "res/test.pgn".into(),
            address: "localhost:8888".into(),
        }
    }
}

impl Relay {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let game = Game::open(&self.pgn)
            .with_context(|| format!("failed to load `{}`", self.pgn.display()))?;

        let link = Tcp::connect(self.address.as_str())
            .await
            .with_context(|| format!("failed to reach `{}`", self.address))?;

        let sent = lib::relay::Relay::new(self.options)
            .run(&game, link)
            .await
            .context("the relay was interrupted")?;

        info!(sent, "game relayed");

        Ok(())
    }
}
