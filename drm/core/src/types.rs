use core::fmt;
use core::str::FromStr;

use data_encoding::BASE64;
use uuid::Uuid;

use crate::error::{KeyError, ParseError};
use crate::utils::{bytes_equal, eq_ignore_ascii_case, hex_digit, is_hex};

/**
    DRM content protection system identifier.

    Recognizes the DRM systems registered with DASH-IF that a CPIX document
    may signal. Unrecognized system IDs are captured in the `Unknown` variant.

    Reference: <https://dashif.org/identifiers/content_protection/>
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemId {
    Widevine,
    PlayReady,
    FairPlay,
    ClearKey,
    Primetime,
    Marlin,
    Verimatrix,
    Irdeto,
    Latens,
    ViaccessOrca,
    Unknown([u8; 16]),
}

impl SystemId {
    /**
        Identify a DRM system from its 16-byte UUID.
    */
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        use crate::constants::*;
        if bytes_equal(&bytes, &WIDEVINE_SYSTEM_ID) {
            Self::Widevine
        } else if bytes_equal(&bytes, &PLAYREADY_SYSTEM_ID) {
            Self::PlayReady
        } else if bytes_equal(&bytes, &FAIRPLAY_SYSTEM_ID) {
            Self::FairPlay
        } else if bytes_equal(&bytes, &CLEARKEY_SYSTEM_ID) {
            Self::ClearKey
        } else if bytes_equal(&bytes, &PRIMETIME_SYSTEM_ID) {
            Self::Primetime
        } else if bytes_equal(&bytes, &MARLIN_SYSTEM_ID) {
            Self::Marlin
        } else if bytes_equal(&bytes, &VERIMATRIX_SYSTEM_ID) {
            Self::Verimatrix
        } else if bytes_equal(&bytes, &IRDETO_SYSTEM_ID) {
            Self::Irdeto
        } else if bytes_equal(&bytes, &LATENS_SYSTEM_ID) {
            Self::Latens
        } else if bytes_equal(&bytes, &VIACCESS_ORCA_SYSTEM_ID) {
            Self::ViaccessOrca
        } else {
            Self::Unknown(bytes)
        }
    }

    /**
        Return the raw 16-byte UUID for this system.
    */
    pub const fn to_bytes(self) -> [u8; 16] {
        use crate::constants::*;
        match self {
            Self::Widevine => WIDEVINE_SYSTEM_ID,
            Self::PlayReady => PLAYREADY_SYSTEM_ID,
            Self::FairPlay => FAIRPLAY_SYSTEM_ID,
            Self::ClearKey => CLEARKEY_SYSTEM_ID,
            Self::Primetime => PRIMETIME_SYSTEM_ID,
            Self::Marlin => MARLIN_SYSTEM_ID,
            Self::Verimatrix => VERIMATRIX_SYSTEM_ID,
            Self::Irdeto => IRDETO_SYSTEM_ID,
            Self::Latens => LATENS_SYSTEM_ID,
            Self::ViaccessOrca => VIACCESS_ORCA_SYSTEM_ID,
            Self::Unknown(bytes) => bytes,
        }
    }

    /**
        Human-readable name for this system.
    */
    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Widevine => "Widevine",
            Self::PlayReady => "PlayReady",
            Self::FairPlay => "FairPlay",
            Self::ClearKey => "ClearKey",
            Self::Primetime => "Primetime",
            Self::Marlin => "Marlin",
            Self::Verimatrix => "Verimatrix",
            Self::Irdeto => "Irdeto",
            Self::Latens => "Latens",
            Self::ViaccessOrca => "ViaccessOrca",
            Self::Unknown(_) => "Unknown",
        }
    }

    /**
        Parse a UUID string into a `SystemId`.

        Accepts both hyphenated (`9a04f079-9840-4286-ab92-e65be0885f95`) and
        plain (`9a04f07998404286ab92e65be0885f95`) formats. Hex digits are
        case-insensitive.
    */
    pub const fn from_uuid(s: &[u8]) -> Option<Self> {
        let mut bytes = [0u8; 16];
        let mut bi = 0; // index into bytes
        let mut si = 0; // index into s

        while si < s.len() {
            if s[si] == b'-' {
                si += 1;
                continue;
            }
            if bi >= 16 || si + 1 >= s.len() {
                return None;
            }
            let hi = match hex_digit(s[si]) {
                Some(v) => v,
                None => return None,
            };
            let lo = match hex_digit(s[si + 1]) {
                Some(v) => v,
                None => return None,
            };
            bytes[bi] = (hi << 4) | lo;
            bi += 1;
            si += 2;
        }

        if bi != 16 {
            return None;
        }

        Some(Self::from_bytes(bytes))
    }

    /**
        Format as a standard UUID string (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
    */
    pub fn to_uuid(self) -> String {
        Uuid::from_bytes(self.to_bytes()).hyphenated().to_string()
    }

    /**
        Returns `true` for recognized DRM systems.
    */
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /**
        Returns `true` for unrecognized DRM systems.
    */
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_name(), self.to_uuid())
    }
}

impl FromStr for SystemId {
    type Err = ParseError;

    /**
        Accepts a UUID (any of the forms `from_uuid` takes) or a system name.
    */
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().as_bytes();
        if let Some(id) = Self::from_uuid(trimmed) {
            return Ok(id);
        }
        [
            Self::Widevine,
            Self::PlayReady,
            Self::FairPlay,
            Self::ClearKey,
            Self::Primetime,
            Self::Marlin,
            Self::Verimatrix,
            Self::Irdeto,
            Self::Latens,
            Self::ViaccessOrca,
        ]
        .into_iter()
        .find(|id| eq_ignore_ascii_case(id.to_name().as_bytes(), trimmed))
        .ok_or_else(|| ParseError {
            kind: "system ID",
            value: s.to_owned(),
        })
    }
}

/**
    A 128-bit content key identifier.

    The canonical form is a UUID. Two binary forms exist and must not be mixed up:

    - [`KeyId::to_bytes`] — big-endian (RFC 4122) order, used in ISOBMFF boxes
      and CPIX documents.
    - [`KeyId::to_guid_bytes`] — little-endian GUID order (first three fields
      byte-swapped), used inside PlayReady WRM headers and checksum input.
*/
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(Uuid);

impl KeyId {
    /**
        Key ID from big-endian (RFC 4122) bytes.
    */
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /**
        Key ID from little-endian GUID bytes, as found in a WRM header.
    */
    pub const fn from_guid_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes_le(bytes))
    }

    /**
        Key ID from a big-endian byte slice, which must be exactly 16 bytes.
    */
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 16] = bytes.try_into().map_err(|_| {
            KeyError::InvalidKeyId(format!("expected 16 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /**
        Big-endian (RFC 4122) bytes.
    */
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /**
        Big-endian (RFC 4122) bytes.
    */
    pub const fn to_bytes(self) -> [u8; 16] {
        *self.0.as_bytes()
    }

    /**
        Little-endian GUID bytes.
    */
    pub fn to_guid_bytes(self) -> [u8; 16] {
        self.0.to_bytes_le()
    }

    /**
        Lowercase hex without dashes.
    */
    pub fn to_hex(self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.0.hyphenated())
    }
}

/**
    Parse a key ID from hyphenated UUID text or 32 hex digits.
*/
impl FromStr for KeyId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s.trim())
            .map(Self)
            .map_err(|e| KeyError::InvalidKeyId(format!("'{s}': {e}")))
    }
}

/**
    A 16-byte AES-128 content encryption key.

    Externally represented as hex or base64 text. `Debug` only shows the
    first two bytes.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey([u8; 16]);

impl ContentKey {
    pub const LEN: usize = 16;

    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /**
        Content key from a byte slice, which must be exactly 16 bytes.
    */
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 16] = bytes.try_into().map_err(|_| {
            KeyError::InvalidContentKey(format!("expected 16 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(bytes))
    }

    /**
        Content key from 32 hex digits (either case).
    */
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim()).map_err(|e| KeyError::InvalidContentKey(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /**
        Content key from standard base64 of 16 bytes.
    */
    pub fn from_base64(s: &str) -> Result<Self, KeyError> {
        let bytes = BASE64
            .decode(s.trim().as_bytes())
            .map_err(|e| KeyError::InvalidContentKey(format!("invalid base64: {e}")))?;
        Self::from_slice(&bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn to_hex_upper(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/**
    Parse a content key from 32 hex digits, or failing that, base64.
*/
impl FromStr for ContentKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 2 * Self::LEN && is_hex(trimmed.as_bytes()) {
            Self::from_hex(trimmed)
        } else {
            Self::from_base64(trimmed)
        }
    }
}
