use core::fmt;
use core::str::FromStr;

use drm_core::{ContentKey, KeyId, PsshVersion};
use drm_playready_format::{Algorithm, WrmHeaderVersion};

use crate::crypto::KeySeed;
use crate::error::PlayReadyError;

/**
    A key to signal in PlayReady protection metadata.

    The content key is only needed to compute the header checksum; it is
    never written into any output.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionKey {
    pub key_id: KeyId,
    pub content_key: Option<ContentKey>,
}

impl ProtectionKey {
    pub fn new(key_id: KeyId, content_key: ContentKey) -> Self {
        Self {
            key_id,
            content_key: Some(content_key),
        }
    }

    pub fn key_id_only(key_id: KeyId) -> Self {
        Self {
            key_id,
            content_key: None,
        }
    }

    /**
        Fill in a missing content key by deriving it from `seed`.
        A key that already carries a content key is returned unchanged.
    */
    pub fn or_derive(self, seed: &KeySeed) -> Self {
        match self.content_key {
            Some(_) => self,
            None => Self::new(self.key_id, seed.derive(self.key_id)),
        }
    }
}

impl fmt::Display for ProtectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content_key {
            Some(key) => write!(f, "{}:{}", self.key_id.to_hex(), key.to_hex()),
            None => write!(f, "{}", self.key_id.to_hex()),
        }
    }
}

/**
    Parse `kid` or `kid:content_key`.

    The key ID is a UUID (hyphenated or 32 hex digits); the content key is
    32 hex digits or base64.
*/
impl FromStr for ProtectionKey {
    type Err = PlayReadyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kid, key) = match s.split_once(':') {
            Some((kid, key)) => (kid, Some(key)),
            None => (s, None),
        };
        let key_id = kid.parse::<KeyId>()?;
        let content_key = key.map(str::parse::<ContentKey>).transpose()?;
        Ok(Self {
            key_id,
            content_key,
        })
    }
}

/**
    WRM header policy.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOptions {
    pub algorithm: Algorithm,
    pub version: WrmHeaderVersion,
    /// Embed a `CHECKSUM` per key. Requires every key to carry a content key.
    pub use_checksum: bool,
    pub lui_url: Option<String>,
    pub ds_id: Option<String>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AesCtr,
            version: WrmHeaderVersion::default(),
            use_checksum: true,
            lui_url: None,
            ds_id: None,
        }
    }
}

impl HeaderOptions {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_version(mut self, version: WrmHeaderVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_checksum(mut self, use_checksum: bool) -> Self {
        self.use_checksum = use_checksum;
        self
    }

    pub fn with_lui_url(mut self, url: impl Into<String>) -> Self {
        self.lui_url = Some(url.into());
        self
    }

    pub fn with_ds_id(mut self, ds_id: impl Into<String>) -> Self {
        self.ds_id = Some(ds_id.into());
        self
    }
}

/**
    PSSH box policy: the header policy plus the box version.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PsshOptions {
    pub header: HeaderOptions,
    pub version: PsshVersion,
}

impl PsshOptions {
    pub fn with_header(mut self, header: HeaderOptions) -> Self {
        self.header = header;
        self
    }

    pub fn with_version(mut self, version: PsshVersion) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TEST_KEY_SEED;

    const KID: &str = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";

    #[test]
    fn parse_kid_and_hex_key() {
        let key: ProtectionKey = format!("{KID}:DBFD6922C321C4BB486F4A1C44097ED6")
            .parse()
            .unwrap();
        assert_eq!(key.key_id.to_string(), KID);
        assert_eq!(
            key.content_key.unwrap().to_hex(),
            "dbfd6922c321c4bb486f4a1c44097ed6"
        );
    }

    #[test]
    fn parse_kid_and_base64_key() {
        let key: ProtectionKey = "8ba94ade6eb9449db44fa5beefaf43b0:2/1pIsMhxLtIb0ocRAl+1g=="
            .parse()
            .unwrap();
        assert_eq!(
            key.content_key.unwrap().to_hex_upper(),
            "DBFD6922C321C4BB486F4A1C44097ED6"
        );
    }

    #[test]
    fn parse_kid_only() {
        let key: ProtectionKey = KID.parse().unwrap();
        assert_eq!(key.content_key, None);
        assert_eq!(key.to_string(), "8ba94ade6eb9449db44fa5beefaf43b0");
    }

    #[test]
    fn parse_errors_keep_their_kind() {
        assert!(matches!(
            "nope".parse::<ProtectionKey>(),
            Err(PlayReadyError::InvalidKeyId(_))
        ));
        assert!(matches!(
            format!("{KID}:abcd").parse::<ProtectionKey>(),
            Err(PlayReadyError::InvalidContentKey(_))
        ));
    }

    #[test]
    fn or_derive_fills_missing_key_only() {
        let seed = KeySeed::from_base64(TEST_KEY_SEED).unwrap();
        let derived = KID.parse::<ProtectionKey>().unwrap().or_derive(&seed);
        assert_eq!(
            derived.content_key.unwrap().to_hex_upper(),
            "DBFD6922C321C4BB486F4A1C44097ED6"
        );

        let explicit = ProtectionKey::new(derived.key_id, ContentKey::new([1; 16]));
        assert_eq!(explicit.or_derive(&seed), explicit);
    }

    #[test]
    fn header_defaults() {
        let options = HeaderOptions::default();
        assert_eq!(options.algorithm, Algorithm::AesCtr);
        assert_eq!(options.version, WrmHeaderVersion::V4_2_0_0);
        assert!(options.use_checksum);
        assert_eq!(PsshOptions::default().version, PsshVersion::V1);
    }
}
