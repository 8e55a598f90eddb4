use thiserror::Error;

use drm_core::{KeyError, KeyId, PsshError};
use drm_playready_format::{FormatError, WrmHeaderVersion};

/**
    Errors from building PlayReady protection metadata.

    Every failure is detected before any output is produced.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayReadyError {
    // ── Key material ──────────────────────────────────────────────────
    #[error("invalid key seed: {0}")]
    InvalidSeed(String),
    #[error("invalid key ID: {0}")]
    InvalidKeyId(String),
    #[error("invalid content key: {0}")]
    InvalidContentKey(String),
    #[error("key {0} has no content key to compute a checksum from")]
    MissingContentKey(KeyId),

    // ── Build-side limits ─────────────────────────────────────────────
    #[error("at least one key is required")]
    NoKeys,
    #[error("WRM header version {version} supports a single key, got {count}")]
    UnsupportedMultiKey {
        version: WrmHeaderVersion,
        count: usize,
    },
    #[error("payload of {0} bytes does not fit its length field")]
    PayloadTooLarge(usize),
    #[error("too many key IDs for a PSSH box ({0})")]
    TooManyKeys(usize),

    // ── Parse-side (delegated) ────────────────────────────────────────
    #[error(transparent)]
    Format(FormatError),
    #[error(transparent)]
    Pssh(PsshError),
}

pub type PlayReadyResult<T> = Result<T, PlayReadyError>;

impl From<FormatError> for PlayReadyError {
    fn from(e: FormatError) -> Self {
        match e {
            FormatError::NoKeys => Self::NoKeys,
            FormatError::UnsupportedMultiKey { version, count } => {
                Self::UnsupportedMultiKey { version, count }
            }
            FormatError::PayloadTooLarge(len) => Self::PayloadTooLarge(len),
            other => Self::Format(other),
        }
    }
}

impl From<PsshError> for PlayReadyError {
    fn from(e: PsshError) -> Self {
        match e {
            PsshError::NoKeyIds => Self::NoKeys,
            PsshError::TooManyKeyIds(count) => Self::TooManyKeys(count),
            PsshError::PayloadTooLarge(len) => Self::PayloadTooLarge(len),
            other => Self::Pssh(other),
        }
    }
}

impl From<KeyError> for PlayReadyError {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::InvalidKeyId(msg) => Self::InvalidKeyId(msg),
            KeyError::InvalidContentKey(msg) => Self::InvalidContentKey(msg),
        }
    }
}
