use thiserror::Error;

use crate::types::SystemId;

/**
    Errors from PSSH box parsing and serialization.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PsshError {
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("malformed PSSH box: {0}")]
    Malformed(String),

    #[error("PSSH system ID is {0}, expected {1}")]
    SystemIdMismatch(SystemId, SystemId),

    #[error("version 1 PSSH box requires at least one key ID")]
    NoKeyIds,

    #[error("too many key IDs for a PSSH box ({0})")]
    TooManyKeyIds(usize),

    #[error("PSSH payload too large ({0} bytes)")]
    PayloadTooLarge(usize),
}

/**
    Errors from parsing key identifiers and content keys.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid key ID: {0}")]
    InvalidKeyId(String),

    #[error("invalid content key: {0}")]
    InvalidContentKey(String),
}

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
