/*!
    PlayReady Object (PRO) binary container.

    The payload of a PlayReady `pssh` box. All integers little-endian:

      [0..4]    length: u32 (total object size including this field)
      [4..6]    record_count: u16
      per record:
        [+0..2]   record_type: u16
        [+2..4]   record_length: u16 (bytes of record data)
        [+4..]    record_data

    Record type 1 holds a UTF-16 LE WRM header.
*/

use crate::error::FormatError;
use crate::wrm_header::WrmHeader;

const OBJECT_HEADER_LEN: usize = 6;
const RECORD_HEADER_LEN: usize = 4;

/**
    PRO record type.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    RightsManagementHeader,
    Reserved,
    EmbeddedLicenseStore,
    Unknown(u16),
}

impl RecordType {
    pub const fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::RightsManagementHeader,
            2 => Self::Reserved,
            3 => Self::EmbeddedLicenseStore,
            other => Self::Unknown(other),
        }
    }

    pub const fn to_u16(self) -> u16 {
        match self {
            Self::RightsManagementHeader => 1,
            Self::Reserved => 2,
            Self::EmbeddedLicenseStore => 3,
            Self::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProRecord {
    pub record_type: RecordType,
    pub data: Vec<u8>,
}

impl ProRecord {
    pub fn new(record_type: RecordType, data: Vec<u8>) -> Self {
        Self { record_type, data }
    }

    pub fn is_wrm_header(&self) -> bool {
        self.record_type == RecordType::RightsManagementHeader
    }
}

/**
    A PlayReady Object: an ordered list of typed records.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayReadyObject {
    pub records: Vec<ProRecord>,
}

impl PlayReadyObject {
    pub fn new(records: Vec<ProRecord>) -> Self {
        Self { records }
    }

    /**
        Single-record object wrapping the UTF-16 LE form of `header`.
    */
    pub fn from_wrm_header(header: &WrmHeader) -> Result<Self, FormatError> {
        Ok(Self::from_wrm_header_bytes(header.to_utf16le()?))
    }

    /**
        Single-record object wrapping an already encoded WRM header.
    */
    pub fn from_wrm_header_bytes(utf16le: Vec<u8>) -> Self {
        Self::new(vec![ProRecord::new(
            RecordType::RightsManagementHeader,
            utf16le,
        )])
    }

    /**
        Total encoded size in bytes.
    */
    pub fn encoded_len(&self) -> usize {
        OBJECT_HEADER_LEN
            + self
                .records
                .iter()
                .map(|r| RECORD_HEADER_LEN + r.data.len())
                .sum::<usize>()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let total = self.encoded_len();
        let total_u32 = u32::try_from(total).map_err(|_| FormatError::PayloadTooLarge(total))?;
        let count = u16::try_from(self.records.len())
            .map_err(|_| FormatError::PayloadTooLarge(self.records.len()))?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&total_u32.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        for record in &self.records {
            let len = u16::try_from(record.data.len())
                .map_err(|_| FormatError::PayloadTooLarge(record.data.len()))?;
            out.extend_from_slice(&record.record_type.to_u16().to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&record.data);
        }
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < OBJECT_HEADER_LEN {
            return Err(FormatError::Malformed(format!(
                "object too short: {} bytes",
                data.len()
            )));
        }

        let total = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if total != data.len() {
            return Err(FormatError::Malformed(format!(
                "length field {total} does not match {} available bytes",
                data.len()
            )));
        }

        let count = u16::from_le_bytes([data[4], data[5]]) as usize;
        let mut records = Vec::with_capacity(count);
        let mut offset = OBJECT_HEADER_LEN;

        for index in 0..count {
            let header_end = offset + RECORD_HEADER_LEN;
            if header_end > data.len() {
                return Err(FormatError::Malformed(format!(
                    "record {index} header truncated at offset {offset}"
                )));
            }
            let record_type = u16::from_le_bytes([data[offset], data[offset + 1]]);
            let len = u16::from_le_bytes([data[offset + 2], data[offset + 3]]) as usize;

            let data_end = header_end + len;
            if data_end > data.len() {
                return Err(FormatError::Malformed(format!(
                    "record {index} data truncated: need {len} bytes at offset {header_end}"
                )));
            }

            records.push(ProRecord::new(
                RecordType::from_u16(record_type),
                data[header_end..data_end].to_vec(),
            ));
            offset = data_end;
        }

        if offset != data.len() {
            return Err(FormatError::Malformed(format!(
                "{} trailing bytes after last record",
                data.len() - offset
            )));
        }

        Ok(Self { records })
    }

    /**
        Raw bytes of the first type-1 record, if any.
    */
    pub fn wrm_header_bytes(&self) -> Option<&[u8]> {
        self.records
            .iter()
            .find(|r| r.is_wrm_header())
            .map(|r| r.data.as_slice())
    }

    /**
        Parse the first type-1 record as a WRM header.
    */
    pub fn wrm_header(&self) -> Result<WrmHeader, FormatError> {
        let bytes = self
            .wrm_header_bytes()
            .ok_or_else(|| FormatError::Malformed("no WRM header record".into()))?;
        WrmHeader::from_utf16le(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrm_header::{Algorithm, Checksum, WrmHeaderVersion, WrmKid};
    use drm_core::KeyId;
    use hex_literal::hex;

    fn vector_header() -> WrmHeader {
        WrmHeader::new(
            WrmHeaderVersion::V4_2_0_0,
            Algorithm::AesCtr,
            vec![WrmKid::new(
                KeyId::from_bytes(hex!("8ba94ade6eb9449db44fa5beefaf43b0")),
                Some(Checksum::new(hex!("31ee3ccfbd67baa6"))),
            )],
        )
        .with_la_url("https://test.playready.microsoft.com/service/rightsmanager.asmx")
    }

    #[test]
    fn single_record_prefix() {
        let pro = PlayReadyObject::from_wrm_header(&vector_header()).unwrap();
        let bytes = pro.to_bytes().unwrap();
        assert_eq!(bytes.len(), 0x28e);
        assert_eq!(&bytes[..10], &hex!("8e020000 0100 0100 8402"));
        assert_eq!(&bytes[10..12], b"<\x00");
    }

    #[test]
    fn parse_back_and_extract_header() {
        let header = vector_header();
        let bytes = PlayReadyObject::from_wrm_header(&header)
            .unwrap()
            .to_bytes()
            .unwrap();
        let pro = PlayReadyObject::from_bytes(&bytes).unwrap();
        assert_eq!(pro.records.len(), 1);
        assert_eq!(pro.wrm_header().unwrap(), header);
    }

    #[test]
    fn skips_non_header_records() {
        let pro = PlayReadyObject::new(vec![
            ProRecord::new(RecordType::EmbeddedLicenseStore, vec![0; 8]),
            ProRecord::new(RecordType::RightsManagementHeader, vec![1, 2]),
        ]);
        let parsed = PlayReadyObject::from_bytes(&pro.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed.records[0].record_type, RecordType::EmbeddedLicenseStore);
        assert_eq!(parsed.wrm_header_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn oversized_record_rejected() {
        let pro = PlayReadyObject::from_wrm_header_bytes(vec![0; 0x1_0000]);
        assert_eq!(
            pro.to_bytes().unwrap_err(),
            FormatError::PayloadTooLarge(0x1_0000)
        );
    }

    #[test]
    fn truncated_input_rejected() {
        assert!(PlayReadyObject::from_bytes(&[0x06, 0, 0]).is_err());
        // length says 12 but record claims 4 bytes of data after its 4-byte header
        let bad = hex!("0c000000 0100 0100 0400 aabb");
        assert!(matches!(
            PlayReadyObject::from_bytes(&bad).unwrap_err(),
            FormatError::Malformed(_)
        ));
        let wrong_total = hex!("ff000000 0000");
        assert!(PlayReadyObject::from_bytes(&wrong_total).is_err());
    }

    #[test]
    fn record_type_values() {
        assert_eq!(RecordType::from_u16(1), RecordType::RightsManagementHeader);
        assert_eq!(RecordType::from_u16(9), RecordType::Unknown(9));
        assert_eq!(RecordType::Unknown(9).to_u16(), 9);
    }
}
