use core::fmt;
use core::str::FromStr;

use crate::error::{ParseError, PsshError};
use crate::types::{KeyId, SystemId};

/**
    PSSH box version.

    Version 1 carries an explicit key ID list ahead of the payload,
    version 0 does not.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PsshVersion {
    V0,
    #[default]
    V1,
}

impl PsshVersion {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            0 => Some(Self::V0),
            1 => Some(Self::V1),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }
}

impl fmt::Display for PsshVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

impl FromStr for PsshVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_u8)
            .ok_or_else(|| ParseError {
                kind: "PSSH version",
                value: s.to_owned(),
            })
    }
}

/**
    ISOBMFF `pssh` box.

    Layout (all integers big-endian):
      [0..4]    box_size: u32 (total box size including this field)
      [4..8]    box_type: "pssh"
      [8]       version: u8 (0 or 1)
      [9..12]   flags: u24 (0x000000)
      [12..28]  system_id: 16 bytes
      if version == 1:
        [28..32]  key_id_count: u32
        [32..]    key_ids: key_id_count * 16 bytes, RFC 4122 byte order
      [..]      data_size: u32
      [..]      data: data_size bytes
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsshBox {
    /**
        PSSH box version.
    */
    pub version: PsshVersion,
    /**
        3-byte flags field (all zeros for boxes built here).
    */
    pub flags: [u8; 3],
    /**
        16-byte DRM system identifier.
    */
    pub system_id: [u8; 16],
    /**
        Key IDs from the box header (v1 only). Empty for v0 boxes.
    */
    pub key_ids: Vec<KeyId>,
    /**
        Raw data payload. For PlayReady this is a PlayReady Object.
    */
    pub data: Vec<u8>,
}

impl PsshBox {
    /**
        Create a PSSH box for `system`.

        Version 1 boxes must list at least one key ID. Key IDs passed with
        version 0 are dropped, since that version has no field for them.
    */
    pub fn new(
        system: SystemId,
        version: PsshVersion,
        key_ids: Vec<KeyId>,
        data: Vec<u8>,
    ) -> Result<Self, PsshError> {
        let key_ids = match version {
            PsshVersion::V0 => Vec::new(),
            PsshVersion::V1 if key_ids.is_empty() => return Err(PsshError::NoKeyIds),
            PsshVersion::V1 => key_ids,
        };
        Ok(PsshBox {
            version,
            flags: [0; 3],
            system_id: system.to_bytes(),
            key_ids,
            data,
        })
    }

    /**
        Parse a base64-encoded PSSH box.
    */
    pub fn from_base64(pssh: &str) -> Result<Self, PsshError> {
        let bytes = data_encoding::BASE64
            .decode(pssh.trim().as_bytes())
            .map_err(|e| PsshError::InvalidBase64(format!("PSSH: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /**
        Parse a PSSH box from raw bytes (full ISOBMFF box starting with box_size).
    */
    pub fn from_bytes(input: &[u8]) -> Result<Self, PsshError> {
        // 4 (size) + 4 (type) + 1 (ver) + 3 (flags) + 16 (sysid) + 4 (data_size)
        if input.len() < 32 {
            return Err(pssh_err("input too short for PSSH box header"));
        }

        let box_size = read_u32_be(input, 0) as usize;
        if box_size > input.len() {
            return Err(pssh_err("box_size exceeds input length"));
        }

        let box_data = &input[..box_size];
        if box_data.len() < 32 {
            return Err(pssh_err("box_size too small for PSSH box header"));
        }
        if &box_data[4..8] != b"pssh" {
            return Err(pssh_err("box_type is not 'pssh'"));
        }

        let version = PsshVersion::from_u8(box_data[8])
            .ok_or_else(|| pssh_err(&format!("unsupported version {}", box_data[8])))?;

        let mut flags = [0u8; 3];
        flags.copy_from_slice(&box_data[9..12]);

        let mut system_id = [0u8; 16];
        system_id.copy_from_slice(&box_data[12..28]);

        let mut offset = 28;
        let mut key_ids = Vec::new();

        if version == PsshVersion::V1 {
            check_bounds(box_data, offset, 4, "key_id_count")?;
            let kid_count = read_u32_be(box_data, offset) as usize;
            offset += 4;

            let kids_len = kid_count
                .checked_mul(16)
                .ok_or_else(|| pssh_err("key_id_count overflows"))?;
            check_bounds(box_data, offset, kids_len, "key_ids")?;
            for chunk in box_data[offset..offset + kids_len].chunks_exact(16) {
                let mut kid = [0u8; 16];
                kid.copy_from_slice(chunk);
                key_ids.push(KeyId::from_bytes(kid));
            }
            offset += kids_len;
        }

        check_bounds(box_data, offset, 4, "data_size")?;
        let data_size = read_u32_be(box_data, offset) as usize;
        offset += 4;

        check_bounds(box_data, offset, data_size, "data")?;
        let data = box_data[offset..offset + data_size].to_vec();
        offset += data_size;

        if offset != box_size {
            return Err(pssh_err(&format!(
                "trailing bytes: consumed {offset}, box_size {box_size}"
            )));
        }

        Ok(PsshBox {
            version,
            flags,
            system_id,
            key_ids,
            data,
        })
    }

    /**
        Serialize to ISOBMFF PSSH box bytes.

        Every length field is checked against its fixed width before anything
        is written; on error no bytes are returned.
    */
    pub fn to_bytes(&self) -> Result<Vec<u8>, PsshError> {
        if self.version == PsshVersion::V1 && self.key_ids.is_empty() {
            return Err(PsshError::NoKeyIds);
        }

        // header: 4 (size) + 4 (type) + 1 (ver) + 3 (flags) + 16 (sysid) = 28
        let mut size = 28usize;
        let mut kid_count = 0u32;
        if self.version == PsshVersion::V1 {
            kid_count = field_u32(self.key_ids.len(), PsshError::TooManyKeyIds)?;
            size += 4 + self.key_ids.len() * 16;
        }
        let data_size = field_u32(self.data.len(), PsshError::PayloadTooLarge)?;
        size += 4 + self.data.len();
        let box_size = field_u32(size, PsshError::PayloadTooLarge)?;

        let mut buf = Vec::with_capacity(size);

        buf.extend_from_slice(&box_size.to_be_bytes());
        buf.extend_from_slice(b"pssh");
        buf.push(self.version.to_u8());
        buf.extend_from_slice(&self.flags);
        buf.extend_from_slice(&self.system_id);

        if self.version == PsshVersion::V1 {
            buf.extend_from_slice(&kid_count.to_be_bytes());
            for kid in &self.key_ids {
                buf.extend_from_slice(kid.as_bytes());
            }
        }

        buf.extend_from_slice(&data_size.to_be_bytes());
        buf.extend_from_slice(&self.data);

        Ok(buf)
    }

    /**
        Serialize to a base64-encoded PSSH box string.
    */
    pub fn to_base64(&self) -> Result<String, PsshError> {
        Ok(data_encoding::BASE64.encode(&self.to_bytes()?))
    }

    /**
        Key IDs from the box header (v1 only).

        For v0 boxes this is always empty; DRM-specific code must parse the
        data payload to find the key IDs.
    */
    pub fn key_ids(&self) -> &[KeyId] {
        &self.key_ids
    }

    /**
        Raw init data payload (the `data` field inside the PSSH box).
    */
    pub fn init_data(&self) -> &[u8] {
        &self.data
    }

    /**
        Identify the DRM system from the PSSH box's system ID.
    */
    pub fn system_id(&self) -> SystemId {
        SystemId::from_bytes(self.system_id)
    }

    /**
        Check that this PSSH box belongs to the given DRM system.
        Returns `Err(PsshError::SystemIdMismatch)` if it does not.
    */
    pub fn ensure_system_id(&self, expected: SystemId) -> Result<(), PsshError> {
        let actual = self.system_id();
        if actual == expected {
            Ok(())
        } else {
            Err(PsshError::SystemIdMismatch(actual, expected))
        }
    }
}

fn read_u32_be(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn field_u32(len: usize, err: fn(usize) -> PsshError) -> Result<u32, PsshError> {
    u32::try_from(len).map_err(|_| err(len))
}

fn check_bounds(data: &[u8], offset: usize, need: usize, field: &str) -> Result<(), PsshError> {
    match offset.checked_add(need) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(pssh_err(&format!("truncated {field}"))),
    }
}

fn pssh_err(msg: &str) -> PsshError {
    PsshError::Malformed(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const PR_SYSID: [u8; 16] = hex!("9a04f07998404286ab92e65be0885f95");

    /// Build a minimal v0 PSSH box with the given data payload.
    fn build_v0_pssh(data: &[u8]) -> Vec<u8> {
        // header(28) + data_size(4) + data
        let box_size = (32 + data.len()) as u32;
        let mut buf = Vec::new();
        buf.extend_from_slice(&box_size.to_be_bytes());
        buf.extend_from_slice(b"pssh");
        buf.push(0);
        buf.extend_from_slice(&[0, 0, 0]);
        buf.extend_from_slice(&PR_SYSID);
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        buf.extend_from_slice(data);
        buf
    }

    fn kid(n: u8) -> KeyId {
        let mut bytes = [0u8; 16];
        bytes[15] = n;
        KeyId::from_bytes(bytes)
    }

    #[test]
    fn v0_box_matches_manual_layout() {
        let pssh = PsshBox::new(
            SystemId::PlayReady,
            PsshVersion::V0,
            vec![kid(1)],
            b"test-pssh-data".to_vec(),
        )
        .unwrap();
        assert!(pssh.key_ids().is_empty());
        assert_eq!(pssh.to_bytes().unwrap(), build_v0_pssh(b"test-pssh-data"));
    }

    #[test]
    fn v1_box_layout() {
        let pssh = PsshBox::new(
            SystemId::PlayReady,
            PsshVersion::V1,
            vec![kid(1), kid(2)],
            b"payload".to_vec(),
        )
        .unwrap();
        let raw = pssh.to_bytes().unwrap();

        assert_eq!(raw.len(), 32 + 4 + 2 * 16 + 7);
        assert_eq!(&raw[0..4], &(raw.len() as u32).to_be_bytes());
        assert_eq!(&raw[4..12], b"pssh\x01\x00\x00\x00");
        assert_eq!(&raw[12..28], &PR_SYSID);
        assert_eq!(&raw[28..32], &[0, 0, 0, 2]);
        assert_eq!(&raw[32..48], kid(1).as_bytes());
        assert_eq!(&raw[48..64], kid(2).as_bytes());
        assert_eq!(&raw[64..68], &[0, 0, 0, 7]);
        assert_eq!(&raw[68..], b"payload");
    }

    #[test]
    fn v1_parse_back() {
        let pssh = PsshBox::new(
            SystemId::PlayReady,
            PsshVersion::V1,
            vec![kid(7)],
            Vec::new(),
        )
        .unwrap();
        let parsed = PsshBox::from_bytes(&pssh.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, pssh);
        assert_eq!(parsed.key_ids(), &[kid(7)]);
    }

    #[test]
    fn v1_requires_key_ids() {
        let err = PsshBox::new(SystemId::PlayReady, PsshVersion::V1, vec![], vec![1]).unwrap_err();
        assert_eq!(err, PsshError::NoKeyIds);

        let mut pssh =
            PsshBox::new(SystemId::PlayReady, PsshVersion::V1, vec![kid(1)], vec![]).unwrap();
        pssh.key_ids.clear();
        assert_eq!(pssh.to_bytes().unwrap_err(), PsshError::NoKeyIds);
    }

    #[test]
    fn length_fields_are_range_checked() {
        assert_eq!(
            field_u32(u32::MAX as usize, PsshError::TooManyKeyIds),
            Ok(u32::MAX)
        );
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            field_u32(u32::MAX as usize + 1, PsshError::TooManyKeyIds),
            Err(PsshError::TooManyKeyIds(u32::MAX as usize + 1))
        );
    }

    #[test]
    fn base64_round_trip() {
        let raw = build_v0_pssh(b"hello");
        let pssh = PsshBox::from_bytes(&raw).unwrap();
        let b64 = pssh.to_base64().unwrap();
        let pssh2 = PsshBox::from_base64(&b64).unwrap();
        assert_eq!(pssh, pssh2);
    }

    #[test]
    fn ensure_system_id() {
        let pssh = PsshBox::from_bytes(&build_v0_pssh(b"data")).unwrap();
        pssh.ensure_system_id(SystemId::PlayReady).unwrap();
        let err = pssh.ensure_system_id(SystemId::Widevine).unwrap_err();
        assert!(matches!(err, PsshError::SystemIdMismatch(_, _)));
    }

    #[test]
    fn not_pssh_box_type() {
        let mut raw = build_v0_pssh(b"data");
        raw[4..8].copy_from_slice(b"moof");
        let err = PsshBox::from_bytes(&raw).unwrap_err();
        assert!(matches!(err, PsshError::Malformed(_)));
    }

    #[test]
    fn truncated_input() {
        let err = PsshBox::from_bytes(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, PsshError::Malformed(_)));
    }

    #[test]
    fn unsupported_version() {
        let mut raw = build_v0_pssh(b"data");
        raw[8] = 2;
        let err = PsshBox::from_bytes(&raw).unwrap_err();
        assert!(matches!(err, PsshError::Malformed(_)));
    }

    #[test]
    fn pssh_version_parse() {
        assert_eq!("0".parse::<PsshVersion>(), Ok(PsshVersion::V0));
        assert_eq!(" 1 ".parse::<PsshVersion>(), Ok(PsshVersion::V1));
        assert!("2".parse::<PsshVersion>().is_err());
        assert_eq!(PsshVersion::default(), PsshVersion::V1);
    }
}
