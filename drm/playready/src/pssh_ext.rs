/*!
    PlayReady extension trait for `PsshBox`.

    `PlayReadyExt` adds PlayReady-specific methods to `drm_core::PsshBox`:
    - Parse the PlayReady Object (PRO) payload
    - Extract and parse the WRM header from the type-1 record
    - Collect KIDs from the WRM header (GUID byte order resolved)
*/

use drm_core::{KeyId, PsshBox, SystemId};
use drm_playready_format::{PlayReadyObject, WrmHeader};

use crate::error::PlayReadyResult;

pub trait PlayReadyExt {
    /**
        Parse the box payload as a PlayReady Object.
        Fails if the box does not carry the PlayReady system ID.
    */
    fn playready_object(&self) -> PlayReadyResult<PlayReadyObject>;

    /**
        Parse the WRM header carried in the PlayReady Object.
    */
    fn wrm_header(&self) -> PlayReadyResult<WrmHeader> {
        Ok(self.playready_object()?.wrm_header()?)
    }

    /**
        Key IDs listed in the WRM header.

        Version 0 boxes have no key ID list of their own, so the header is
        the only source that works for both box versions.
    */
    fn playready_key_ids(&self) -> PlayReadyResult<Vec<KeyId>> {
        Ok(self.wrm_header()?.kids.iter().map(|k| k.key_id).collect())
    }
}

impl PlayReadyExt for PsshBox {
    fn playready_object(&self) -> PlayReadyResult<PlayReadyObject> {
        self.ensure_system_id(SystemId::PlayReady)?;
        Ok(PlayReadyObject::from_bytes(self.init_data())?)
    }
}
