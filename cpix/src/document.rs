use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use tracing::debug;

use crate::content_key::ContentKey;
use crate::drm_system::DrmSystem;
use crate::error::{CpixError, CpixResult};
use crate::period::PeriodList;
use crate::usage_rule::UsageRule;
use crate::xml::{CPIX_NS, PSKC_NS, XSI_NS, end, start};

/**
    A CPIX document.

    Each list is optional; an empty list is not written at all.
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cpix {
    pub content_keys: Vec<ContentKey>,
    pub drm_systems: Vec<DrmSystem>,
    pub periods: PeriodList,
    pub usage_rules: Vec<UsageRule>,
}

impl Cpix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_key(mut self, key: ContentKey) -> Self {
        self.content_keys.push(key);
        self
    }

    pub fn with_drm_system(mut self, system: DrmSystem) -> Self {
        self.drm_systems.push(system);
        self
    }

    pub fn with_periods(mut self, periods: PeriodList) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_usage_rule(mut self, rule: UsageRule) -> Self {
        self.usage_rules.push(rule);
        self
    }

    /**
        Render the document as indented UTF-8 XML with a declaration.
    */
    pub fn to_xml(&self) -> CpixResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("CPIX");
        root.push_attribute(("xmlns", CPIX_NS));
        root.push_attribute(("xmlns:xsi", XSI_NS));
        root.push_attribute(("xmlns:pskc", PSKC_NS));
        root.push_attribute(("xsi:schemaLocation", "urn:dashif:org:cpix cpix.xsd"));
        start(&mut writer, root)?;

        if !self.content_keys.is_empty() {
            start(&mut writer, BytesStart::new("ContentKeyList"))?;
            for key in &self.content_keys {
                key.write_xml(&mut writer)?;
            }
            end(&mut writer, "ContentKeyList")?;
        }

        if !self.drm_systems.is_empty() {
            start(&mut writer, BytesStart::new("DRMSystemList"))?;
            for system in &self.drm_systems {
                system.write_xml(&mut writer)?;
            }
            end(&mut writer, "DRMSystemList")?;
        }

        if !self.periods.is_empty() {
            self.periods.write_xml(&mut writer)?;
        }

        if !self.usage_rules.is_empty() {
            start(&mut writer, BytesStart::new("ContentKeyUsageRuleList"))?;
            for rule in &self.usage_rules {
                rule.write_xml(&mut writer)?;
            }
            end(&mut writer, "ContentKeyUsageRuleList")?;
        }

        end(&mut writer, "CPIX")?;

        let xml = String::from_utf8(writer.into_inner())
            .map_err(|e| CpixError::InvalidXml(e.to_string()))?;
        debug!(
            content_keys = self.content_keys.len(),
            drm_systems = self.drm_systems.len(),
            periods = self.periods.len(),
            usage_rules = self.usage_rules.len(),
            len = xml.len(),
            "rendered CPIX document"
        );
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use crate::usage_rule::{Filter, VideoFilter};
    use drm_core::{KeyId, SystemId};

    const KID: &str = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";

    fn kid() -> KeyId {
        KID.parse().unwrap()
    }

    #[test]
    fn empty_document() {
        let xml = Cpix::new().to_xml().unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<CPIX xmlns=\"urn:dashif:org:cpix\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
xmlns:pskc=\"urn:ietf:params:xml:ns:keyprov:pskc\" xsi:schemaLocation=\"urn:dashif:org:cpix cpix.xsd\">\n\
</CPIX>"
        );
    }

    #[test]
    fn sections_in_schema_order() {
        let doc = Cpix::new()
            .with_usage_rule(UsageRule::new(
                kid(),
                vec![Filter::Video(VideoFilter {
                    max_pixels: Some(589_824),
                    ..Default::default()
                })],
            ))
            .with_periods(PeriodList::new(vec![Period::indexed("keyperiod_0", 0)]))
            .with_drm_system(
                DrmSystem::new(kid(), SystemId::PlayReady)
                    .unwrap()
                    .with_pssh(vec![0, 0, 0, 8]),
            )
            .with_content_key(
                ContentKey::parse(KID, "2/1pIsMhxLtIb0ocRAl+1g==").unwrap(),
            );
        let xml = doc.to_xml().unwrap();

        let order = [
            "<ContentKeyList>",
            "<DRMSystemList>",
            "<ContentKeyPeriodList>",
            "<ContentKeyUsageRuleList>",
        ]
        .map(|tag| xml.find(tag).unwrap());
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{xml}");

        assert!(xml.contains("<pskc:PlainValue>2/1pIsMhxLtIb0ocRAl+1g==</pskc:PlainValue>"));
        assert!(xml.contains("<PSSH>AAAACA==</PSSH>"));
        assert!(xml.contains("<ContentKeyPeriod id=\"keyperiod_0\" index=\"0\"/>"));
        assert!(xml.contains("<VideoFilter maxPixels=\"589824\"/>"));
    }

    #[test]
    fn periods_survive_a_document_round_trip() {
        let periods = PeriodList::new(vec![
            Period::indexed("p0", 0),
            Period::parse_windowed("p1", "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z").unwrap(),
        ]);
        let xml = Cpix::new().with_periods(periods.clone()).to_xml().unwrap();
        assert_eq!(PeriodList::parse(&xml).unwrap(), periods);
    }
}
