use aes::{
    Aes128,
    cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray},
};

use drm_core::{ContentKey, KeyId};
use drm_playready_format::Checksum;

/**
    PlayReady key checksum.

    Encrypts the key ID in little-endian GUID byte order as a single
    AES-128-ECB block under the content key and keeps the first 8 bytes:

      checksum = AES-ECB(content_key, guid_bytes(key_id))[0..8]
*/
pub fn key_checksum(key_id: KeyId, content_key: &ContentKey) -> Checksum {
    let block = encrypt_block(content_key.as_bytes(), &key_id.to_guid_bytes());
    let mut checksum = [0u8; 8];
    checksum.copy_from_slice(&block[..8]);
    Checksum::new(checksum)
}

/**
    Single-block AES-128 encryption, no chaining and no padding.
*/
fn encrypt_block(key: &[u8; 16], block: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes128::new(key.into());
    let mut block = GenericArray::from(*block);
    cipher.encrypt_block(&mut block);
    block.into()
}
