use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{InspectPsshCommand, PlayReadyCommand};

/**
    DRM command-line tool.
*/
#[derive(Parser)]
#[command(name = "drm-cli")]
pub struct Cli {
    /// Default log filter, e.g. `debug` or `drm_playready=trace`. `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// PlayReady protection metadata commands.
    #[command(name = "playready")]
    PlayReady(PlayReadyCommand),
    /// Inspect a PSSH box.
    InspectPssh(InspectPsshCommand),
}

impl Cli {
    /**
        Install the stderr log subscriber.
    */
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            Command::PlayReady(cmd) => cmd.run(),
            Command::InspectPssh(cmd) => cmd.run(),
        }
    }
}
