mod codec;
mod constants;
mod crypto;
mod error;
mod pssh_ext;
mod types;

pub mod format {
    pub use drm_playready_format::*;
}

// Re-export shared DRM types from drm-core
pub use drm_core::{
    ContentKey, KeyId, PLAYREADY_SYSTEM_ID, PsshBox, PsshError, PsshVersion, SystemId,
};
pub use drm_playready_format::{Algorithm, Checksum, WrmHeader, WrmHeaderVersion};

// PlayReady-specific exports
pub use self::codec::{
    build_pssh, build_wrm_header, checksum, generate_content_key, generate_playready_object,
    generate_pssh, generate_wrm_header, wrap_pssh,
};
pub use self::constants::{KEY_SEED_LEN, TEST_KEY_SEED, TEST_LA_URL};
pub use self::crypto::KeySeed;
pub use self::error::{PlayReadyError, PlayReadyResult};
pub use self::pssh_ext::PlayReadyExt;
pub use self::types::{HeaderOptions, ProtectionKey, PsshOptions};
