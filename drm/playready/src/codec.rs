/*!
    PlayReady protection metadata codec.

    key ID (+ content key or key seed)
      → checksum
      → WRM header (UTF-16 LE XML)
      → PlayReady Object
      → `pssh` box

    Every function is pure: the same input always yields the same bytes.
*/

use tracing::{debug, trace, warn};

use drm_core::{ContentKey, KeyId, PsshBox, PsshVersion, SystemId};
use drm_playready_format::{Checksum, PlayReadyObject, WrmHeader, WrmHeaderVersion, WrmKid};

use crate::crypto::{KeySeed, key_checksum};
use crate::error::{PlayReadyError, PlayReadyResult};
use crate::types::{HeaderOptions, ProtectionKey, PsshOptions};

/**
    Derive the content key for `key_id` from a base64 key seed.
*/
pub fn generate_content_key(key_id: KeyId, seed: &str) -> PlayReadyResult<ContentKey> {
    Ok(KeySeed::from_base64(seed)?.derive(key_id))
}

/**
    8-byte checksum proving the key ID / content key pairing.
*/
pub fn checksum(key_id: KeyId, content_key: &ContentKey) -> Checksum {
    key_checksum(key_id, content_key)
}

/**
    Build the WRM header for `keys`.

    `AESCBC` needs version 4.3.0.0; an older requested version is raised to it.
*/
pub fn build_wrm_header(
    keys: &[ProtectionKey],
    la_url: &str,
    options: &HeaderOptions,
) -> PlayReadyResult<WrmHeader> {
    if keys.is_empty() {
        return Err(PlayReadyError::NoKeys);
    }

    let version = effective_version(options);

    let mut kids = Vec::with_capacity(keys.len());
    for key in keys {
        let checksum = if options.use_checksum {
            let content_key = key
                .content_key
                .as_ref()
                .ok_or(PlayReadyError::MissingContentKey(key.key_id))?;
            trace!(key_id = %key.key_id, "computing key checksum");
            Some(key_checksum(key.key_id, content_key))
        } else {
            None
        };
        kids.push(WrmKid::new(key.key_id, checksum));
    }

    let mut header = WrmHeader::new(version, options.algorithm, kids).with_la_url(la_url);
    header.lui_url = options.lui_url.clone();
    header.ds_id = options.ds_id.clone();
    header.validate()?;

    Ok(header)
}

/**
    WRM header for `keys` as UTF-16 LE bytes.
*/
pub fn generate_wrm_header(
    keys: &[ProtectionKey],
    la_url: &str,
    options: &HeaderOptions,
) -> PlayReadyResult<Vec<u8>> {
    let header = build_wrm_header(keys, la_url, options)?;
    let bytes = header.to_utf16le()?;
    debug!(
        version = %header.version,
        algorithm = %header.algorithm,
        keys = header.kids.len(),
        len = bytes.len(),
        "built WRM header"
    );
    Ok(bytes)
}

/**
    Wrap an encoded WRM header in a single-record PlayReady Object.
*/
pub fn generate_playready_object(wrm_header: &[u8]) -> PlayReadyResult<Vec<u8>> {
    let bytes = PlayReadyObject::from_wrm_header_bytes(wrm_header.to_vec()).to_bytes()?;
    debug!(len = bytes.len(), "built PlayReady object");
    Ok(bytes)
}

/**
    Wrap `payload` in a PlayReady `pssh` box.

    Version 1 lists `key_ids` in the box header and requires at least one;
    version 0 ignores them.
*/
pub fn wrap_pssh(
    payload: Vec<u8>,
    key_ids: Vec<KeyId>,
    version: PsshVersion,
) -> PlayReadyResult<PsshBox> {
    Ok(PsshBox::new(SystemId::PlayReady, version, key_ids, payload)?)
}

/**
    Build the complete PlayReady `pssh` box for `keys`.
*/
pub fn build_pssh(
    keys: &[ProtectionKey],
    la_url: &str,
    options: &PsshOptions,
) -> PlayReadyResult<PsshBox> {
    let wrm_header = generate_wrm_header(keys, la_url, &options.header)?;
    let pro = generate_playready_object(&wrm_header)?;
    let key_ids = keys.iter().map(|k| k.key_id).collect();
    wrap_pssh(pro, key_ids, options.version)
}

/**
    PlayReady `pssh` box for `keys` as bytes.
*/
pub fn generate_pssh(
    keys: &[ProtectionKey],
    la_url: &str,
    options: &PsshOptions,
) -> PlayReadyResult<Vec<u8>> {
    let bytes = build_pssh(keys, la_url, options)?.to_bytes()?;
    debug!(
        version = %options.version,
        keys = keys.len(),
        len = bytes.len(),
        "built PlayReady PSSH box"
    );
    Ok(bytes)
}

fn effective_version(options: &HeaderOptions) -> WrmHeaderVersion {
    let minimum = WrmHeaderVersion::minimum_for(options.algorithm);
    if options.version < minimum {
        warn!(
            requested = %options.version,
            algorithm = %options.algorithm,
            using = %minimum,
            "WRM header version too old for algorithm, raising it"
        );
        minimum
    } else {
        options.version
    }
}
