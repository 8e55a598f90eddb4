use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use data_encoding::BASE64;
use tracing::debug;

use cpix::{Cpix, DrmSystem};
use drm_playready::{
    Algorithm, HeaderOptions, KeySeed, ProtectionKey, PsshOptions, PsshVersion, SystemId,
    TEST_LA_URL, WrmHeaderVersion, generate_pssh,
};

/**
    Output encoding of the PSSH box.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `--iss.drm_specific_data=<base64>` for a packager configuration.
    Packager,
    Base64,
    Hex,
}

/**
    Build a PlayReady PSSH box.
*/
#[derive(Args)]
pub struct PsshCommand {
    /// Keys as `kid[:content_key]`, comma separated. Content keys are hex or base64.
    #[arg(long, required = true, value_delimiter = ',')]
    pub keys: Vec<ProtectionKey>,

    /// License acquisition URL.
    #[arg(long, visible_alias = "la-url", default_value = TEST_LA_URL)]
    pub url: String,

    /// Key seed (base64) used to derive content keys missing from `--keys`.
    #[arg(long)]
    pub seed: Option<KeySeed>,

    /// Signal AES-CBC (`cbcs`) instead of AES-CTR (`cenc`).
    #[arg(long)]
    pub cbcs: bool,

    #[arg(long, default_value_t = PsshVersion::V1)]
    pub pssh_version: PsshVersion,

    #[arg(long, default_value_t = WrmHeaderVersion::V4_2_0_0)]
    pub wrm_version: WrmHeaderVersion,

    /// Embed key checksums in the WRM header. Every key then needs a content key.
    #[arg(long)]
    pub use_checksum: bool,

    /// License UI URL.
    #[arg(long)]
    pub lui_url: Option<String>,

    /// Domain service ID.
    #[arg(long)]
    pub ds_id: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Packager)]
    pub format: OutputFormat,

    /// Print a CPIX document carrying the keys and the PSSH box instead.
    #[arg(long)]
    pub cpix: bool,
}

impl PsshCommand {
    pub fn run(self) -> Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let keys = self.resolved_keys();
        debug!(
            keys = keys.len(),
            seeded = self.seed.is_some(),
            "building PlayReady PSSH"
        );
        let pssh = generate_pssh(&keys, &self.url, &self.options())
            .context("failed to build PlayReady PSSH box")?;

        if self.cpix {
            return cpix_document(&keys, &pssh);
        }

        Ok(match self.format {
            OutputFormat::Packager => format!("--iss.drm_specific_data={}", BASE64.encode(&pssh)),
            OutputFormat::Base64 => BASE64.encode(&pssh),
            OutputFormat::Hex => hex::encode(&pssh),
        })
    }

    fn resolved_keys(&self) -> Vec<ProtectionKey> {
        match &self.seed {
            Some(seed) => self.keys.iter().map(|k| k.or_derive(seed)).collect(),
            None => self.keys.clone(),
        }
    }

    fn options(&self) -> PsshOptions {
        let algorithm = if self.cbcs {
            Algorithm::AesCbc
        } else {
            Algorithm::AesCtr
        };

        let mut header = HeaderOptions::default()
            .with_algorithm(algorithm)
            .with_version(self.wrm_version)
            .with_checksum(self.use_checksum);
        if let Some(url) = &self.lui_url {
            header = header.with_lui_url(url);
        }
        if let Some(ds_id) = &self.ds_id {
            header = header.with_ds_id(ds_id);
        }

        PsshOptions::default()
            .with_header(header)
            .with_version(self.pssh_version)
    }
}

/**
    One `ContentKey` per key with known key material, and one PlayReady
    `DRMSystem` per key carrying the shared PSSH box.
*/
fn cpix_document(keys: &[ProtectionKey], pssh: &[u8]) -> Result<String> {
    let mut doc = Cpix::new();
    for key in keys {
        if let Some(cek) = key.content_key {
            doc = doc.with_content_key(cpix::ContentKey::new(key.key_id, cek));
        }
        let system = DrmSystem::new(key.key_id, SystemId::PlayReady)
            .context("failed to build DRMSystem")?
            .with_pssh(pssh);
        doc = doc.with_drm_system(system);
    }
    doc.to_xml().context("failed to render CPIX document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use drm_playready::{PlayReadyExt, PsshBox};

    const KEY: &str = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0:DBFD6922C321C4BB486F4A1C44097ED6";

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        cmd: PsshCommand,
    }

    fn parse(args: &[&str]) -> PsshCommand {
        TestCli::try_parse_from(std::iter::once("pssh").chain(args.iter().copied()))
            .unwrap()
            .cmd
    }

    #[test]
    fn defaults() {
        let cmd = parse(&["--keys", KEY]);
        assert_eq!(cmd.url, TEST_LA_URL);
        assert_eq!(cmd.pssh_version, PsshVersion::V1);
        assert_eq!(cmd.wrm_version, WrmHeaderVersion::V4_2_0_0);
        assert_eq!(cmd.format, OutputFormat::Packager);
        assert!(!cmd.cbcs && !cmd.use_checksum && !cmd.cpix);
    }

    #[test]
    fn packager_output_for_test_key() {
        let out = parse(&["--keys", KEY, "--use-checksum"]).render().unwrap();
        let b64 = out.strip_prefix("--iss.drm_specific_data=").unwrap();
        let pssh = BASE64.decode(b64.as_bytes()).unwrap();
        assert_eq!(pssh.len(), 0x2C2);
        assert_eq!(&pssh[4..8], b"pssh");
    }

    #[test]
    fn hex_output() {
        let out = parse(&["--keys", KEY, "--use-checksum", "--format", "hex"]).render().unwrap();
        assert!(out.starts_with("000002c270737368"));
    }

    #[test]
    fn seed_fills_missing_content_keys() {
        let with_seed = parse(&[
            "--keys",
            "8ba94ade-6eb9-449d-b44f-a5beefaf43b0",
            "--seed",
            drm_playready::TEST_KEY_SEED,
            "--use-checksum",
        ]);
        assert_eq!(
            with_seed.render().unwrap(),
            parse(&["--keys", KEY, "--use-checksum"]).render().unwrap()
        );
    }

    #[test]
    fn bare_key_id_builds_header_without_checksum() {
        let kid_only = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";
        let out = parse(&["--keys", kid_only, "--format", "base64"])
            .render()
            .unwrap();
        let header = PsshBox::from_base64(&out).unwrap().wrm_header().unwrap();
        assert_eq!(header.kids.len(), 1);
        assert_eq!(header.kids[0].key_id.to_string(), kid_only);
        assert!(header.kids[0].checksum.is_none());
        assert!(!header.to_xml().unwrap().contains("CHECKSUM"));
    }

    #[test]
    fn checksum_needs_content_key_or_seed() {
        let kid_only = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";
        assert!(parse(&["--keys", kid_only, "--use-checksum"]).render().is_err());
        assert!(
            parse(&[
                "--keys",
                kid_only,
                "--use-checksum",
                "--seed",
                drm_playready::TEST_KEY_SEED
            ])
            .render()
            .is_ok()
        );
    }

    #[test]
    fn multiple_keys_and_options() {
        let cmd = parse(&[
            "--keys",
            &format!("{KEY},11111111-2222-3333-4444-555555555555:AAAAAAAAAAAAAAAAAAAAAA=="),
            "--cbcs",
            "--pssh-version",
            "0",
            "--wrm-version",
            "4.3.0.0",
            "--la-url",
            "https://license.example.com/",
        ]);
        assert_eq!(cmd.keys.len(), 2);
        assert_eq!(cmd.pssh_version, PsshVersion::V0);
        let options = cmd.options();
        assert_eq!(options.header.algorithm, Algorithm::AesCbc);
        assert_eq!(options.header.version, WrmHeaderVersion::V4_3_0_0);
        assert!(cmd.render().is_ok());
    }

    #[test]
    fn cpix_output() {
        let xml = parse(&["--keys", KEY, "--use-checksum", "--cpix"]).render().unwrap();
        assert!(xml.contains("<pskc:PlainValue>2/1pIsMhxLtIb0ocRAl+1g==</pskc:PlainValue>"));
        assert!(xml.contains("systemId=\"9a04f079-9840-4286-ab92-e65be0885f95\""));
        assert!(xml.contains("<PSSH>AAACwnBzc2g"));
    }

    #[test]
    fn invalid_inputs_rejected_at_parse_time() {
        let args = |extra: &[&'static str]| {
            let mut v = vec!["pssh", "--keys", KEY];
            v.extend_from_slice(extra);
            TestCli::try_parse_from(v)
        };
        assert!(args(&["--pssh-version", "2"]).is_err());
        assert!(args(&["--wrm-version", "5.0.0.0"]).is_err());
        assert!(args(&["--format", "xml"]).is_err());
        assert!(TestCli::try_parse_from(["pssh"]).is_err());
        assert!(TestCli::try_parse_from(["pssh", "--keys", "nope"]).is_err());
    }
}
