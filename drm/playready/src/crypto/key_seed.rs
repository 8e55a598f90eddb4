use core::fmt;
use core::str::FromStr;

use data_encoding::BASE64;
use sha2::{Digest, Sha256};

use drm_core::{ContentKey, KeyId};

use crate::constants::KEY_SEED_LEN;
use crate::error::PlayReadyError;

/**
    Key seed shared between a packager and a PlayReady license server.

    Content keys are derived from the seed and the key ID, so only key IDs
    need to travel with the content. Given as base64 text that must decode
    to exactly 30 bytes.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct KeySeed([u8; KEY_SEED_LEN]);

impl KeySeed {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PlayReadyError> {
        let seed: [u8; KEY_SEED_LEN] = bytes.try_into().map_err(|_| {
            PlayReadyError::InvalidSeed(format!(
                "expected {KEY_SEED_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(seed))
    }

    pub fn from_base64(seed: &str) -> Result<Self, PlayReadyError> {
        let bytes = BASE64
            .decode(seed.trim().as_bytes())
            .map_err(|e| PlayReadyError::InvalidSeed(format!("invalid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /**
        Derive the content key for `key_id`.

        With `s` the seed and `k` the key ID in GUID byte order:

          A = SHA-256(s || k)
          B = SHA-256(s || k || s)
          C = SHA-256(s || k || s || k)
          key[i] = A[i] ^ A[i+16] ^ B[i] ^ B[i+16] ^ C[i] ^ C[i+16]
    */
    pub fn derive(&self, key_id: KeyId) -> ContentKey {
        let seed = &self.0;
        let kid = key_id.to_guid_bytes();

        let a = Sha256::new().chain_update(seed).chain_update(kid).finalize();
        let b = Sha256::new()
            .chain_update(seed)
            .chain_update(kid)
            .chain_update(seed)
            .finalize();
        let c = Sha256::new()
            .chain_update(seed)
            .chain_update(kid)
            .chain_update(seed)
            .chain_update(kid)
            .finalize();

        let mut key = [0u8; 16];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = a[i] ^ a[i + 16] ^ b[i] ^ b[i + 16] ^ c[i] ^ c[i + 16];
        }
        ContentKey::new(key)
    }
}

impl FromStr for KeySeed {
    type Err = PlayReadyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl fmt::Debug for KeySeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeySeed(..)")
    }
}
