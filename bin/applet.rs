use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod dump;
mod relay;

pub use dump::Dump;
pub use relay::Relay;

#[derive(Debug, Eq, PartialEq, From, Subcommand)]
pub enum Applet {
    Relay(Relay),
    Dump(Dump),
}

impl Default for Applet {
    fn default() -> Self {
        Relay::default().into()
    }
}

impl Applet {
    pub async fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Relay(a) => a.execute().await,
            Applet::Dump(a) => a.execute(),
        }
    }
}
