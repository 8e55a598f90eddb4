use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::BytesStart;

use drm_core::KeyId;

use crate::error::CpixResult;
use crate::xml::{empty, encode_bool, end, start};

/**
    A `<ContentKeyUsageRule>`: which content a key may protect.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRule {
    pub kid: KeyId,
    pub filters: Vec<Filter>,
}

/**
    Usage rule filter. All attributes are optional; absent ones are omitted.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    KeyPeriod(KeyPeriodFilter),
    Label(LabelFilter),
    Video(VideoFilter),
    Audio(AudioFilter),
    Bitrate(BitrateFilter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPeriodFilter {
    pub period_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilter {
    pub min_pixels: Option<u64>,
    pub max_pixels: Option<u64>,
    pub hdr: Option<bool>,
    pub wcg: Option<bool>,
    pub min_fps: Option<f64>,
    pub max_fps: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioFilter {
    pub min_channels: Option<u32>,
    pub max_channels: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitrateFilter {
    pub min_bitrate: Option<u64>,
    pub max_bitrate: Option<u64>,
}

impl UsageRule {
    pub fn new(kid: KeyId, filters: Vec<Filter>) -> Self {
        Self { kid, filters }
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> CpixResult<()> {
        let kid = self.kid.to_string();
        let mut elem = BytesStart::new("ContentKeyUsageRule");
        elem.push_attribute(("kid", kid.as_str()));

        if self.filters.is_empty() {
            return empty(writer, elem);
        }

        start(writer, elem)?;
        for filter in &self.filters {
            empty(writer, filter.element())?;
        }
        end(writer, "ContentKeyUsageRule")
    }
}

impl Filter {
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::KeyPeriod(_) => "KeyPeriodFilter",
            Self::Label(_) => "LabelFilter",
            Self::Video(_) => "VideoFilter",
            Self::Audio(_) => "AudioFilter",
            Self::Bitrate(_) => "BitrateFilter",
        }
    }

    fn element(&self) -> BytesStart<'static> {
        let mut elem = BytesStart::new(self.element_name());
        let mut attr = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                elem.push_attribute((name, value.as_str()));
            }
        };

        match self {
            Self::KeyPeriod(f) => attr("periodId", Some(f.period_id.clone())),
            Self::Label(f) => attr("label", Some(f.label.clone())),
            Self::Video(f) => {
                attr("minPixels", f.min_pixels.map(|v| v.to_string()));
                attr("maxPixels", f.max_pixels.map(|v| v.to_string()));
                attr("hdr", f.hdr.map(|v| encode_bool(v).to_owned()));
                attr("wcg", f.wcg.map(|v| encode_bool(v).to_owned()));
                attr("minFps", f.min_fps.map(|v| v.to_string()));
                attr("maxFps", f.max_fps.map(|v| v.to_string()));
            }
            Self::Audio(f) => {
                attr("minChannels", f.min_channels.map(|v| v.to_string()));
                attr("maxChannels", f.max_channels.map(|v| v.to_string()));
            }
            Self::Bitrate(f) => {
                attr("minBitrate", f.min_bitrate.map(|v| v.to_string()));
                attr("maxBitrate", f.max_bitrate.map(|v| v.to_string()));
            }
        }
        elem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KID: &str = "8ba94ade-6eb9-449d-b44f-a5beefaf43b0";

    fn render(rule: &UsageRule) -> String {
        let mut writer = Writer::new(Vec::new());
        rule.write_xml(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn video_filter_omits_absent_attributes() {
        let rule = UsageRule::new(
            KID.parse().unwrap(),
            vec![Filter::Video(VideoFilter {
                max_pixels: Some(589_824),
                hdr: Some(false),
                max_fps: Some(29.97),
                ..Default::default()
            })],
        );
        assert_eq!(
            render(&rule),
            "<ContentKeyUsageRule kid=\"8ba94ade-6eb9-449d-b44f-a5beefaf43b0\">\
<VideoFilter maxPixels=\"589824\" hdr=\"false\" maxFps=\"29.97\"/></ContentKeyUsageRule>"
        );
    }

    #[test]
    fn every_filter_kind() {
        let rule = UsageRule::new(
            KID.parse().unwrap(),
            vec![
                Filter::KeyPeriod(KeyPeriodFilter {
                    period_id: "keyperiod_1".into(),
                }),
                Filter::Label(LabelFilter {
                    label: "hd".into(),
                }),
                Filter::Audio(AudioFilter {
                    min_channels: Some(1),
                    max_channels: Some(2),
                }),
                Filter::Bitrate(BitrateFilter {
                    min_bitrate: None,
                    max_bitrate: Some(1_000_000),
                }),
            ],
        );
        let xml = render(&rule);
        assert!(xml.contains("<KeyPeriodFilter periodId=\"keyperiod_1\"/>"));
        assert!(xml.contains("<LabelFilter label=\"hd\"/>"));
        assert!(xml.contains("<AudioFilter minChannels=\"1\" maxChannels=\"2\"/>"));
        assert!(xml.contains("<BitrateFilter maxBitrate=\"1000000\"/>"));
    }

    #[test]
    fn rule_without_filters() {
        let rule = UsageRule::new(KID.parse().unwrap(), vec![]);
        assert_eq!(
            render(&rule),
            "<ContentKeyUsageRule kid=\"8ba94ade-6eb9-449d-b44f-a5beefaf43b0\"/>"
        );
    }
}
