use anyhow::Result;
use clap::{Args, Subcommand};

mod content_key;
mod pssh;

use self::content_key::ContentKeyCommand;
use self::pssh::PsshCommand;

/**
    PlayReady protection metadata commands.
*/
#[derive(Args)]
pub struct PlayReadyCommand {
    #[command(subcommand)]
    command: PlayReadySubcommand,
}

#[derive(Subcommand)]
enum PlayReadySubcommand {
    /// Build a PlayReady PSSH box for a packager.
    Pssh(PsshCommand),
    /// Derive a content key from a key seed.
    ContentKey(ContentKeyCommand),
}

impl PlayReadyCommand {
    pub fn run(self) -> Result<()> {
        match self.command {
            PlayReadySubcommand::Pssh(cmd) => cmd.run(),
            PlayReadySubcommand::ContentKey(cmd) => cmd.run(),
        }
    }
}
