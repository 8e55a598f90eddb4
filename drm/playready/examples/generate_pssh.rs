//! Build a PlayReady PSSH box for Microsoft's public test server.
//!
//! The content key is derived from the published test key seed, so the
//! output plays against the test server's license endpoint.
//!
//! Run with:
//!     RUST_LOG=debug cargo run -p drm-playready --example generate_pssh [KID]

use tracing_subscriber::EnvFilter;

use drm_playready::{
    KeyId, KeySeed, PlayReadyExt, ProtectionKey, PsshBox, PsshOptions, TEST_KEY_SEED, TEST_LA_URL,
    generate_pssh,
};

const DEFAULT_KID: &str = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let kid: KeyId = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or(DEFAULT_KID)
        .parse()?;

    let seed = KeySeed::from_base64(TEST_KEY_SEED)?;
    let key = ProtectionKey::key_id_only(kid).or_derive(&seed);
    eprintln!("KID: {kid}");
    eprintln!("Key: {key}");

    let pssh = generate_pssh(&[key], TEST_LA_URL, &PsshOptions::default())?;
    let b64 = data_encoding::BASE64.encode(&pssh);

    // Parse it back to show what a player will see
    let parsed = PsshBox::from_bytes(&pssh)?;
    let header = parsed.wrm_header()?;
    eprintln!(
        "PSSH: {} bytes, WRM header {} with {} key(s)",
        pssh.len(),
        header.version,
        header.kids.len()
    );

    println!("{b64}");
    Ok(())
}
