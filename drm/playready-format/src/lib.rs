mod error;

pub mod pro;
pub mod wrm_header;

pub use self::error::FormatError;
pub use self::pro::{PlayReadyObject, ProRecord, RecordType};
pub use self::wrm_header::{
    Algorithm, Checksum, WRM_HEADER_NS, WrmHeader, WrmHeaderVersion, WrmKid, decode_utf16le,
    encode_utf16le,
};
