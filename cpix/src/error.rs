use thiserror::Error;

use drm_core::{KeyError, SystemId};

/**
    Errors from building or reading CPIX documents.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpixError {
    // ── Model validation ──────────────────────────────────────────────
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("DRM system {0} is not a recognised CPIX system ID")]
    UnknownSystemId(SystemId),
    #[error("invalid key period: {0}")]
    InvalidPeriod(String),
    #[error("invalid date-time '{0}'")]
    InvalidDateTime(String),

    // ── XML ───────────────────────────────────────────────────────────
    #[error("invalid XML: {0}")]
    InvalidXml(String),
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
}

pub type CpixResult<T> = Result<T, CpixError>;

impl From<quick_xml::Error> for CpixError {
    fn from(e: quick_xml::Error) -> Self {
        Self::InvalidXml(e.to_string())
    }
}

impl From<std::io::Error> for CpixError {
    fn from(e: std::io::Error) -> Self {
        Self::InvalidXml(e.to_string())
    }
}
