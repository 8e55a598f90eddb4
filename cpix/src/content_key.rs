use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::BytesStart;

use drm_core::KeyId;

use crate::error::CpixResult;
use crate::xml::{empty, end, start, text_element};

/**
    A `<ContentKey>`: a key ID and, optionally, its content encryption key.

    Without a CEK the element only announces the key ID, which is how a
    requester asks a key server to fill the key in.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentKey {
    pub kid: KeyId,
    pub cek: Option<drm_core::ContentKey>,
}

impl ContentKey {
    pub fn new(kid: KeyId, cek: drm_core::ContentKey) -> Self {
        Self {
            kid,
            cek: Some(cek),
        }
    }

    pub fn without_cek(kid: KeyId) -> Self {
        Self { kid, cek: None }
    }

    /**
        From a UUID string and a base64 CEK, the forms CPIX documents carry.
    */
    pub fn parse(kid: &str, cek_base64: &str) -> CpixResult<Self> {
        Ok(Self::new(
            kid.parse()?,
            drm_core::ContentKey::from_base64(cek_base64)?,
        ))
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> CpixResult<()> {
        let kid = self.kid.to_string();
        let mut elem = BytesStart::new("ContentKey");
        elem.push_attribute(("kid", kid.as_str()));

        let Some(cek) = &self.cek else {
            return empty(writer, elem);
        };

        start(writer, elem)?;
        start(writer, BytesStart::new("Data"))?;
        start(writer, BytesStart::new("pskc:Secret"))?;
        text_element(writer, "pskc:PlainValue", &cek.to_base64())?;
        end(writer, "pskc:Secret")?;
        end(writer, "Data")?;
        end(writer, "ContentKey")
    }
}
