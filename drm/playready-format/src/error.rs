use thiserror::Error;

use crate::wrm_header::{Algorithm, WrmHeaderVersion};

/**
    Errors from building or parsing PlayReady wire formats.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    // ── Build-side validation ─────────────────────────────────────────
    #[error("WRM header requires at least one key ID")]
    NoKeys,
    #[error("WRM header version {version} supports a single KID, got {count}")]
    UnsupportedMultiKey {
        version: WrmHeaderVersion,
        count: usize,
    },
    #[error("algorithm {algorithm} requires a newer WRM header than {version}")]
    UnsupportedAlgorithm {
        algorithm: Algorithm,
        version: WrmHeaderVersion,
    },
    #[error("payload of {0} bytes does not fit its length field")]
    PayloadTooLarge(usize),

    // ── Parse-side ────────────────────────────────────────────────────
    #[error("malformed PlayReady object: {0}")]
    Malformed(String),
    #[error("invalid XML: {0}")]
    InvalidXml(String),
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    #[error("invalid UTF-16 text: {0}")]
    InvalidUtf16(String),
}
