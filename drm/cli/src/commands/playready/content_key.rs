use anyhow::{Context, Result};
use clap::Args;

use drm_playready::{KeyId, TEST_KEY_SEED, generate_content_key};

/**
    Derive a content key from a key seed.
*/
#[derive(Args)]
pub struct ContentKeyCommand {
    /// Key ID (UUID).
    #[arg(long)]
    pub kid: KeyId,

    /// Key seed, base64. Defaults to the PlayReady test server seed.
    #[arg(long, default_value = TEST_KEY_SEED)]
    pub seed: String,
}

impl ContentKeyCommand {
    pub fn run(self) -> Result<()> {
        println!("{}", self.derive()?);
        Ok(())
    }

    fn derive(&self) -> Result<String> {
        let key = generate_content_key(self.kid, &self.seed)
            .with_context(|| format!("failed to derive content key for {}", self.kid))?;
        Ok(key.to_hex_upper())
    }
}
