mod constants;
mod error;
mod pssh;
mod types;

pub mod utils;

pub use self::constants::{
    CLEARKEY_SYSTEM_ID, FAIRPLAY_SYSTEM_ID, IRDETO_SYSTEM_ID, LATENS_SYSTEM_ID, MARLIN_SYSTEM_ID,
    PLAYREADY_SYSTEM_ID, PRIMETIME_SYSTEM_ID, VERIMATRIX_SYSTEM_ID, VIACCESS_ORCA_SYSTEM_ID,
    WIDEVINE_SYSTEM_ID,
};
pub use self::error::{KeyError, ParseError, PsshError};
pub use self::pssh::{PsshBox, PsshVersion};
pub use self::types::{ContentKey, KeyId, SystemId};
