use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Args;

use drm_playready::{PlayReadyExt, PsshBox, SystemId};

/**
    Inspect a PSSH box.
*/
#[derive(Args)]
pub struct InspectPsshCommand {
    /// Base64-encoded PSSH box.
    pub base64: String,
}

impl InspectPsshCommand {
    pub fn run(self) -> Result<()> {
        print!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let pssh = PsshBox::from_base64(&self.base64).context("failed to parse PSSH box")?;
        let mut out = String::new();

        writeln!(out, "Version:    {}", pssh.version)?;
        writeln!(out, "System ID:  {}", pssh.system_id())?;
        writeln!(out, "Data Size:  {} bytes", pssh.data.len())?;

        let kids = pssh.key_ids();
        if !kids.is_empty() {
            writeln!(out)?;
            writeln!(out, "Key IDs ({}):", kids.len())?;
            for kid in kids {
                writeln!(out, "  {kid}")?;
            }
        }

        if pssh.system_id() != SystemId::PlayReady {
            return Ok(out);
        }

        let wrm = pssh
            .wrm_header()
            .context("failed to parse PlayReady WRM header")?;
        writeln!(out)?;
        writeln!(out, "WRM Header: v{}", wrm.version)?;
        writeln!(out, "Algorithm:  {}", wrm.algorithm)?;
        if let Some(url) = &wrm.la_url {
            writeln!(out, "LA URL:     {url}")?;
        }
        if let Some(url) = &wrm.lui_url {
            writeln!(out, "LUI URL:    {url}")?;
        }
        if let Some(ds_id) = &wrm.ds_id {
            writeln!(out, "DS ID:      {ds_id}")?;
        }
        if !wrm.kids.is_empty() {
            writeln!(out)?;
            writeln!(out, "PlayReady Key IDs ({}):", wrm.kids.len())?;
            for kid in &wrm.kids {
                match &kid.checksum {
                    Some(checksum) => {
                        writeln!(out, "  {} (checksum {})", kid.key_id, checksum.to_base64())?
                    }
                    None => writeln!(out, "  {}", kid.key_id)?,
                }
            }
        }

        Ok(out)
    }
}
