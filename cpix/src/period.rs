/*!
    Key periods for key rotation.

    A period is identified by `id` and located either by an integer `index`
    or by a `start`/`end` date-time window, never both.
*/

use std::io::Write;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{CpixError, CpixResult};
use crate::xml::{empty, end, local_name, start};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodTiming {
    Indexed(u64),
    Windowed {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/**
    A `<ContentKeyPeriod>`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub id: String,
    pub timing: PeriodTiming,
}

impl Period {
    pub fn indexed(id: impl Into<String>, index: u64) -> Self {
        Self {
            id: id.into(),
            timing: PeriodTiming::Indexed(index),
        }
    }

    /**
        Fails if `end` is before `start`.
    */
    pub fn windowed(
        id: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> CpixResult<Self> {
        let id = id.into();
        if end < start {
            return Err(CpixError::InvalidPeriod(format!(
                "period '{id}' ends before it starts"
            )));
        }
        Ok(Self {
            id,
            timing: PeriodTiming::Windowed { start, end },
        })
    }

    /**
        Window from RFC 3339 date-time strings.
    */
    pub fn parse_windowed(id: impl Into<String>, start: &str, end: &str) -> CpixResult<Self> {
        Self::windowed(id, parse_datetime(start)?, parse_datetime(end)?)
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> CpixResult<()> {
        empty(writer, self.element())
    }

    fn element(&self) -> BytesStart<'static> {
        let mut elem = BytesStart::new("ContentKeyPeriod");
        elem.push_attribute(("id", self.id.as_str()));
        match &self.timing {
            PeriodTiming::Indexed(index) => {
                elem.push_attribute(("index", index.to_string().as_str()));
            }
            PeriodTiming::Windowed { start, end } => {
                elem.push_attribute(("start", format_datetime(start).as_str()));
                elem.push_attribute(("end", format_datetime(end).as_str()));
            }
        }
        elem
    }

    fn from_element(e: &BytesStart<'_>) -> CpixResult<Self> {
        let mut id = None;
        let mut index = None;
        let mut window_start = None;
        let mut window_end = None;

        for attr in e.attributes() {
            let attr = attr.map_err(|e| CpixError::InvalidXml(e.to_string()))?;
            let value = attr.unescape_value()?;
            match local_name(attr.key.as_ref()) {
                b"id" => id = Some(value.into_owned()),
                b"index" => {
                    let parsed = value.trim().parse::<u64>().map_err(|_| {
                        CpixError::InvalidPeriod(format!("index '{value}' is not an integer"))
                    })?;
                    index = Some(parsed);
                }
                b"start" => window_start = Some(parse_datetime(&value)?),
                b"end" => window_end = Some(parse_datetime(&value)?),
                _ => {}
            }
        }

        let id = id.ok_or(CpixError::MissingAttribute {
            element: "ContentKeyPeriod",
            attribute: "id",
        })?;

        match (index, window_start, window_end) {
            (Some(index), None, None) => Ok(Self::indexed(id, index)),
            (None, Some(start), Some(end)) => Self::windowed(id, start, end),
            (Some(_), _, _) => Err(CpixError::InvalidPeriod(format!(
                "period '{id}' has both index and start/end"
            ))),
            (None, None, None) => Err(CpixError::InvalidPeriod(format!(
                "period '{id}' has neither index nor start/end"
            ))),
            (None, _, _) => Err(CpixError::InvalidPeriod(format!(
                "period '{id}' needs both start and end"
            ))),
        }
    }
}

/**
    A `<ContentKeyPeriodList>`.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodList(pub Vec<Period>);

impl PeriodList {
    pub fn new(periods: Vec<Period>) -> Self {
        Self(periods)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.0.iter()
    }

    /**
        Read periods from XML. Every `ContentKeyPeriod` element is collected,
        whether the input is a bare list or a whole CPIX document.
    */
    pub fn parse(xml: &str) -> CpixResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut periods = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    if local_name(e.name().as_ref()) == b"ContentKeyPeriod" {
                        periods.push(Period::from_element(&e)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        debug!(count = periods.len(), "parsed key periods");
        Ok(Self(periods))
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> CpixResult<()> {
        start(writer, BytesStart::new("ContentKeyPeriodList"))?;
        for period in &self.0 {
            period.write_xml(writer)?;
        }
        end(writer, "ContentKeyPeriodList")
    }
}

impl From<Vec<Period>> for PeriodList {
    fn from(periods: Vec<Period>) -> Self {
        Self(periods)
    }
}

impl<'a> IntoIterator for &'a PeriodList {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn parse_datetime(s: &str) -> CpixResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).map_err(|_| CpixError::InvalidDateTime(s.to_owned()))
}

fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(list: &PeriodList) -> String {
        let mut writer = Writer::new(Vec::new());
        list.write_xml(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn writes_both_timing_forms() {
        let list = PeriodList::new(vec![
            Period::indexed("keyperiod_0", 0),
            Period::parse_windowed("keyperiod_1", "2024-05-01T00:00:00Z", "2024-05-01T01:00:00Z")
                .unwrap(),
        ]);
        assert_eq!(
            render(&list),
            "<ContentKeyPeriodList>\
<ContentKeyPeriod id=\"keyperiod_0\" index=\"0\"/>\
<ContentKeyPeriod id=\"keyperiod_1\" start=\"2024-05-01T00:00:00+00:00\" end=\"2024-05-01T01:00:00+00:00\"/>\
</ContentKeyPeriodList>"
        );
    }

    #[test]
    fn parse_reads_what_is_written() {
        let list = PeriodList::new(vec![
            Period::indexed("a", 7),
            Period::parse_windowed("b", "2024-05-01T00:00:00+02:00", "2024-05-01T00:00:10+02:00")
                .unwrap(),
        ]);
        assert_eq!(PeriodList::parse(&render(&list)).unwrap(), list);
    }

    #[test]
    fn parse_namespaced_document() {
        let xml = r#"<?xml version="1.0"?>
<cpix:CPIX xmlns:cpix="urn:dashif:org:cpix">
  <cpix:ContentKeyPeriodList>
    <cpix:ContentKeyPeriod id="p0" index="3"></cpix:ContentKeyPeriod>
  </cpix:ContentKeyPeriodList>
</cpix:CPIX>"#;
        let list = PeriodList::parse(xml).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.0[0], Period::indexed("p0", 3));
    }

    #[test]
    fn window_must_not_run_backwards() {
        assert!(matches!(
            Period::parse_windowed("p", "2024-05-01T01:00:00Z", "2024-05-01T00:00:00Z"),
            Err(CpixError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn parse_rejects_conflicting_timing() {
        for xml in [
            r#"<ContentKeyPeriod id="p" index="1" start="2024-05-01T00:00:00Z"/>"#,
            r#"<ContentKeyPeriod id="p" start="2024-05-01T00:00:00Z"/>"#,
            r#"<ContentKeyPeriod id="p"/>"#,
        ] {
            assert!(
                matches!(PeriodList::parse(xml), Err(CpixError::InvalidPeriod(_))),
                "{xml}"
            );
        }
    }

    #[test]
    fn parse_reports_missing_id_and_bad_dates() {
        assert_eq!(
            PeriodList::parse(r#"<ContentKeyPeriod index="1"/>"#).unwrap_err(),
            CpixError::MissingAttribute {
                element: "ContentKeyPeriod",
                attribute: "id"
            }
        );
        assert!(matches!(
            PeriodList::parse(r#"<ContentKeyPeriod id="p" start="yesterday" end="today"/>"#),
            Err(CpixError::InvalidDateTime(_))
        ));
    }
}
