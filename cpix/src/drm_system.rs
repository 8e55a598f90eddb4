use std::io::Write;

use data_encoding::BASE64;
use quick_xml::Writer;
use quick_xml::events::BytesStart;

use drm_core::{KeyId, SystemId};

use crate::error::{CpixError, CpixResult};
use crate::xml::{empty, end, start, text_element};

/**
    A `<DRMSystem>`: signaling for one key under one DRM system.

    Payloads are stored raw and written as base64 text.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrmSystem {
    pub kid: KeyId,
    pub system_id: SystemId,
    /// `pssh` box for ISOBMFF output.
    pub pssh: Option<Vec<u8>>,
    /// `<ContentProtection>` XML for a DASH manifest.
    pub content_protection_data: Option<Vec<u8>>,
    /// Signaling for an HLS playlist.
    pub hls_signaling_data: Option<Vec<u8>>,
}

impl DrmSystem {
    /**
        Only the DRM systems registered for CPIX are accepted.
    */
    pub fn new(kid: KeyId, system_id: SystemId) -> CpixResult<Self> {
        if system_id.is_unknown() {
            return Err(CpixError::UnknownSystemId(system_id));
        }
        Ok(Self {
            kid,
            system_id,
            pssh: None,
            content_protection_data: None,
            hls_signaling_data: None,
        })
    }

    pub fn with_pssh(mut self, pssh: impl Into<Vec<u8>>) -> Self {
        self.pssh = Some(pssh.into());
        self
    }

    pub fn with_content_protection_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.content_protection_data = Some(data.into());
        self
    }

    pub fn with_hls_signaling_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.hls_signaling_data = Some(data.into());
        self
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> CpixResult<()> {
        let kid = self.kid.to_string();
        let system_id = self.system_id.to_uuid();
        let mut elem = BytesStart::new("DRMSystem");
        elem.push_attribute(("kid", kid.as_str()));
        elem.push_attribute(("systemId", system_id.as_str()));

        let payloads = [
            ("PSSH", &self.pssh),
            ("ContentProtectionData", &self.content_protection_data),
            ("HLSSignalingData", &self.hls_signaling_data),
        ];
        if payloads.iter().all(|(_, data)| data.is_none()) {
            return empty(writer, elem);
        }

        start(writer, elem)?;
        for (name, data) in payloads {
            if let Some(data) = data {
                text_element(writer, name, &BASE64.encode(data))?;
            }
        }
        end(writer, "DRMSystem")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KID: &str = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";

    fn render(system: &DrmSystem) -> String {
        let mut writer = Writer::new(Vec::new());
        system.write_xml(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn writes_payloads_in_order() {
        let system = DrmSystem::new(KID.parse().unwrap(), SystemId::PlayReady)
            .unwrap()
            .with_hls_signaling_data(b"hls".to_vec())
            .with_pssh(b"pssh".to_vec());
        assert_eq!(
            render(&system),
            "<DRMSystem kid=\"8ba94ade-6eb9-449d-b44f-a5beefaf43b0\" \
systemId=\"9a04f079-9840-4286-ab92-e65be0885f95\">\
<PSSH>cHNzaA==</PSSH><HLSSignalingData>aGxz</HLSSignalingData></DRMSystem>"
        );
    }

    #[test]
    fn bare_system_is_empty_element() {
        let system = DrmSystem::new(KID.parse().unwrap(), SystemId::Widevine).unwrap();
        assert_eq!(
            render(&system),
            "<DRMSystem kid=\"8ba94ade-6eb9-449d-b44f-a5beefaf43b0\" \
systemId=\"edef8ba9-79d6-4ace-a3c8-27dcd51d21ed\"/>"
        );
    }

    #[test]
    fn unknown_system_rejected() {
        let unknown = SystemId::Unknown([0x42; 16]);
        assert_eq!(
            DrmSystem::new(KID.parse().unwrap(), unknown).unwrap_err(),
            CpixError::UnknownSystemId(unknown)
        );
    }
}
