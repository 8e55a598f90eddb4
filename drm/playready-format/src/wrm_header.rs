/*!
    WRM (Windows Rights Management) Header XML format.

    Found inside PlayReady Object (PRO) records (type 1) within PSSH boxes.
    Encoded as UTF-16 LE XML without a byte-order mark or XML declaration.

    Versions: 4.0, 4.1, 4.2, 4.3

    - 4.0.0.0: `<PROTECTINFO>` holds `<KEYLEN>` and `<ALGID>`; a single
      `<KID>` and optional `<CHECKSUM>` are text children of `<DATA>`.
    - 4.1.0.0: a single `<KID ALGID=".." CHECKSUM=".." VALUE="..">` inside
      `<PROTECTINFO>`.
    - 4.2.0.0: `<PROTECTINFO>` → `<KIDS>` → one or more `<KID>`.
    - 4.3.0.0: same as 4.2, and the only version allowing `AESCBC`.

    `VALUE`/`<KID>` hold base64 of the key ID in little-endian GUID byte
    order. `CHECKSUM` holds base64 of the 8-byte key checksum.
*/

use core::fmt;
use core::str::FromStr;

use data_encoding::BASE64;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use drm_core::utils::eq_ignore_ascii_case;
use drm_core::{KeyId, ParseError};

use crate::error::FormatError;

/**
    Namespace of the `<WRMHEADER>` root element, shared by all versions.
*/
pub const WRM_HEADER_NS: &str = "http://schemas.microsoft.com/DRM/2007/03/PlayReadyHeader";

/**
    WRM header schema version.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WrmHeaderVersion {
    V4_0_0_0,
    V4_1_0_0,
    #[default]
    V4_2_0_0,
    V4_3_0_0,
}

impl WrmHeaderVersion {
    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = name.trim_ascii();
        if eq_ignore_ascii_case(name, b"4.0.0.0") {
            Some(Self::V4_0_0_0)
        } else if eq_ignore_ascii_case(name, b"4.1.0.0") {
            Some(Self::V4_1_0_0)
        } else if eq_ignore_ascii_case(name, b"4.2.0.0") {
            Some(Self::V4_2_0_0)
        } else if eq_ignore_ascii_case(name, b"4.3.0.0") {
            Some(Self::V4_3_0_0)
        } else {
            None
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::V4_0_0_0 => "4.0.0.0",
            Self::V4_1_0_0 => "4.1.0.0",
            Self::V4_2_0_0 => "4.2.0.0",
            Self::V4_3_0_0 => "4.3.0.0",
        }
    }

    /**
        Whether more than one `<KID>` may be listed.
    */
    pub const fn supports_multiple_kids(self) -> bool {
        matches!(self, Self::V4_2_0_0 | Self::V4_3_0_0)
    }

    /**
        Oldest version able to carry `algorithm`.
    */
    pub const fn minimum_for(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::AesCtr => Self::V4_0_0_0,
            Algorithm::AesCbc => Self::V4_3_0_0,
        }
    }

    pub const fn supports(self, algorithm: Algorithm) -> bool {
        self as u8 >= Self::minimum_for(algorithm) as u8
    }
}

impl fmt::Display for WrmHeaderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for WrmHeaderVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "WRM header version",
            value: s.to_owned(),
        })
    }
}

/**
    Content encryption algorithm signaled in `ALGID`.

    `AESCBC` is the `cbcs` scheme, `AESCTR` the `cenc` scheme.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[default]
    AesCtr,
    AesCbc,
}

impl Algorithm {
    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = name.trim_ascii();
        if eq_ignore_ascii_case(name, b"AESCTR") {
            Some(Self::AesCtr)
        } else if eq_ignore_ascii_case(name, b"AESCBC") {
            Some(Self::AesCbc)
        } else {
            None
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::AesCtr => "AESCTR",
            Self::AesCbc => "AESCBC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "algorithm",
            value: s.to_owned(),
        })
    }
}

/**
    8-byte key checksum: the first half of the AES-ECB encryption of the
    GUID-ordered key ID under the content key.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 8]);

impl Checksum {
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn from_base64(s: &str) -> Result<Self, FormatError> {
        let bytes = BASE64
            .decode(s.trim().as_bytes())
            .map_err(|e| FormatError::InvalidBase64(format!("CHECKSUM: {e}")))?;
        let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
            FormatError::Malformed(format!("CHECKSUM is {} bytes, expected 8", bytes.len()))
        })?;
        Ok(Self(bytes))
    }
}

/**
    One key entry of a WRM header.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrmKid {
    pub key_id: KeyId,
    pub checksum: Option<Checksum>,
}

impl WrmKid {
    pub fn new(key_id: KeyId, checksum: Option<Checksum>) -> Self {
        Self { key_id, checksum }
    }

    fn value_base64(&self) -> String {
        BASE64.encode(&self.key_id.to_guid_bytes())
    }
}

/**
    A PlayReady WRM header.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrmHeader {
    pub version: WrmHeaderVersion,
    pub algorithm: Algorithm,
    pub kids: Vec<WrmKid>,
    /// License acquisition URL.
    pub la_url: Option<String>,
    /// License UI URL.
    pub lui_url: Option<String>,
    /// Domain service ID.
    pub ds_id: Option<String>,
}

impl WrmHeader {
    pub fn new(version: WrmHeaderVersion, algorithm: Algorithm, kids: Vec<WrmKid>) -> Self {
        Self {
            version,
            algorithm,
            kids,
            la_url: None,
            lui_url: None,
            ds_id: None,
        }
    }

    pub fn with_la_url(mut self, url: impl Into<String>) -> Self {
        self.la_url = Some(url.into());
        self
    }

    pub fn with_lui_url(mut self, url: impl Into<String>) -> Self {
        self.lui_url = Some(url.into());
        self
    }

    pub fn with_ds_id(mut self, ds_id: impl Into<String>) -> Self {
        self.ds_id = Some(ds_id.into());
        self
    }

    /**
        Check that the header can be expressed in its declared version.
    */
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.kids.is_empty() {
            return Err(FormatError::NoKeys);
        }
        if self.kids.len() > 1 && !self.version.supports_multiple_kids() {
            return Err(FormatError::UnsupportedMultiKey {
                version: self.version,
                count: self.kids.len(),
            });
        }
        if !self.version.supports(self.algorithm) {
            return Err(FormatError::UnsupportedAlgorithm {
                algorithm: self.algorithm,
                version: self.version,
            });
        }
        Ok(())
    }

    /**
        Render the header as XML text.
    */
    pub fn to_xml(&self) -> Result<String, FormatError> {
        self.validate()?;

        let mut writer = Writer::new(Vec::new());

        let mut root = BytesStart::new("WRMHEADER");
        root.push_attribute(("xmlns", WRM_HEADER_NS));
        root.push_attribute(("version", self.version.to_name()));
        write_event(&mut writer, Event::Start(root))?;
        write_event(&mut writer, Event::Start(BytesStart::new("DATA")))?;

        match self.version {
            WrmHeaderVersion::V4_0_0_0 => self.write_v4_0_kid(&mut writer)?,
            WrmHeaderVersion::V4_1_0_0 => {
                write_event(&mut writer, Event::Start(BytesStart::new("PROTECTINFO")))?;
                self.write_kid_element(&mut writer, &self.kids[0])?;
                write_event(&mut writer, Event::End(BytesEnd::new("PROTECTINFO")))?;
            }
            WrmHeaderVersion::V4_2_0_0 | WrmHeaderVersion::V4_3_0_0 => {
                write_event(&mut writer, Event::Start(BytesStart::new("PROTECTINFO")))?;
                write_event(&mut writer, Event::Start(BytesStart::new("KIDS")))?;
                for kid in &self.kids {
                    self.write_kid_element(&mut writer, kid)?;
                }
                write_event(&mut writer, Event::End(BytesEnd::new("KIDS")))?;
                write_event(&mut writer, Event::End(BytesEnd::new("PROTECTINFO")))?;
            }
        }

        if let Some(url) = &self.la_url {
            write_text_element(&mut writer, "LA_URL", url)?;
        }
        if let Some(url) = &self.lui_url {
            write_text_element(&mut writer, "LUI_URL", url)?;
        }
        if let Some(ds_id) = &self.ds_id {
            write_text_element(&mut writer, "DS_ID", ds_id)?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new("DATA")))?;
        write_event(&mut writer, Event::End(BytesEnd::new("WRMHEADER")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| FormatError::InvalidXml(e.to_string()))
    }

    /**
        Render the header as UTF-16 LE bytes, the form embedded in a PRO record.
    */
    pub fn to_utf16le(&self) -> Result<Vec<u8>, FormatError> {
        Ok(encode_utf16le(&self.to_xml()?))
    }

    /**
        `<PROTECTINFO><KEYLEN>16</KEYLEN><ALGID>..</ALGID></PROTECTINFO><KID>..</KID><CHECKSUM>..</CHECKSUM>`
    */
    fn write_v4_0_kid(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), FormatError> {
        let kid = &self.kids[0];
        write_event(writer, Event::Start(BytesStart::new("PROTECTINFO")))?;
        write_text_element(writer, "KEYLEN", "16")?;
        write_text_element(writer, "ALGID", self.algorithm.to_name())?;
        write_event(writer, Event::End(BytesEnd::new("PROTECTINFO")))?;
        write_text_element(writer, "KID", &kid.value_base64())?;
        if let Some(checksum) = &kid.checksum {
            write_text_element(writer, "CHECKSUM", &checksum.to_base64())?;
        }
        Ok(())
    }

    /**
        `<KID ALGID=".." CHECKSUM=".." VALUE=".."></KID>`
    */
    fn write_kid_element(
        &self,
        writer: &mut Writer<Vec<u8>>,
        kid: &WrmKid,
    ) -> Result<(), FormatError> {
        let value = kid.value_base64();
        let checksum = kid.checksum.map(|c| c.to_base64());

        let mut elem = BytesStart::new("KID");
        elem.push_attribute(("ALGID", self.algorithm.to_name()));
        if let Some(checksum) = &checksum {
            elem.push_attribute(("CHECKSUM", checksum.as_str()));
        }
        elem.push_attribute(("VALUE", value.as_str()));

        write_event(writer, Event::Start(elem))?;
        write_event(writer, Event::End(BytesEnd::new("KID")))
    }

    /**
        Parse a WRM header from UTF-16 LE bytes.
    */
    pub fn from_utf16le(bytes: &[u8]) -> Result<Self, FormatError> {
        Self::from_xml(&decode_utf16le(bytes)?)
    }

    /**
        Parse a WRM header from XML text. Accepts every schema version this
        module can write; unknown elements are skipped.
    */
    pub fn from_xml(xml: &str) -> Result<Self, FormatError> {
        let mut reader = Reader::from_str(xml);

        let mut version = None;
        let mut algorithm = None;
        let mut kids = Vec::new();
        let mut legacy_checksum = None;
        let mut la_url = None;
        let mut lui_url = None;
        let mut ds_id = None;
        let mut text_target: Option<Vec<u8>> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = local_name(e.name().as_ref()).to_vec();
                    match name.as_slice() {
                        b"WRMHEADER" => version = Some(parse_version_attr(&e)?),
                        b"KID" if has_attr(&e, b"VALUE")? => {
                            kids.push(parse_kid_attrs(&e, &mut algorithm)?);
                        }
                        _ => text_target = Some(name),
                    }
                }
                Ok(Event::Empty(e)) => {
                    let name = e.name();
                    if local_name(name.as_ref()) == b"KID" {
                        kids.push(parse_kid_attrs(&e, &mut algorithm)?);
                    }
                }
                Ok(Event::Text(e)) => {
                    let Some(target) = &text_target else {
                        continue;
                    };
                    let text = e
                        .unescape()
                        .map_err(|e| FormatError::InvalidXml(e.to_string()))?;
                    let text = text.trim();
                    match target.as_slice() {
                        b"KID" => kids.push(WrmKid::new(parse_kid_value(text)?, None)),
                        b"ALGID" => {
                            merge_algorithm(&mut algorithm, parse_algorithm(text.as_bytes())?)?;
                        }
                        b"CHECKSUM" => legacy_checksum = Some(Checksum::from_base64(text)?),
                        b"LA_URL" => la_url = Some(text.to_owned()),
                        b"LUI_URL" => lui_url = Some(text.to_owned()),
                        b"DS_ID" => ds_id = Some(text.to_owned()),
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => text_target = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(FormatError::InvalidXml(e.to_string())),
                _ => {}
            }
        }

        let version =
            version.ok_or_else(|| FormatError::Malformed("missing <WRMHEADER> root".into()))?;

        if let Some(checksum) = legacy_checksum {
            match kids.as_mut_slice() {
                [kid] => kid.checksum = Some(checksum),
                _ => {
                    return Err(FormatError::Malformed(
                        "<CHECKSUM> element requires exactly one <KID>".into(),
                    ));
                }
            }
        }

        Ok(Self {
            version,
            algorithm: algorithm.unwrap_or_default(),
            kids,
            la_url,
            lui_url,
            ds_id,
        })
    }
}

/**
    Encode text as UTF-16 LE bytes without a byte-order mark.
*/
pub fn encode_utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/**
    Decode UTF-16 LE bytes, skipping a leading byte-order mark if present.
*/
pub fn decode_utf16le(bytes: &[u8]) -> Result<String, FormatError> {
    if bytes.len() % 2 != 0 {
        return Err(FormatError::InvalidUtf16(format!(
            "odd byte length {}",
            bytes.len()
        )));
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    let text: String = char::decode_utf16(units)
        .collect::<Result<_, _>>()
        .map_err(|e| FormatError::InvalidUtf16(e.to_string()))?;
    Ok(text.strip_prefix('\u{feff}').map(str::to_owned).unwrap_or(text))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), FormatError> {
    writer
        .write_event(event)
        .map_err(|e| FormatError::InvalidXml(e.to_string()))
}

/**
    `<name>text</name>`, escaping only `&`, `<` and `>` in the text.
*/
fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), FormatError> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn has_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<bool, FormatError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FormatError::InvalidXml(e.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(true);
        }
    }
    Ok(false)
}

fn parse_version_attr(e: &BytesStart<'_>) -> Result<WrmHeaderVersion, FormatError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FormatError::InvalidXml(e.to_string()))?;
        if attr.key.as_ref() == b"version" {
            return WrmHeaderVersion::from_name(&attr.value).ok_or_else(|| {
                FormatError::Malformed(format!(
                    "unsupported WRM header version '{}'",
                    String::from_utf8_lossy(&attr.value)
                ))
            });
        }
    }
    Err(FormatError::Malformed(
        "<WRMHEADER> has no version attribute".into(),
    ))
}

fn parse_kid_attrs(
    e: &BytesStart<'_>,
    algorithm: &mut Option<Algorithm>,
) -> Result<WrmKid, FormatError> {
    let mut key_id = None;
    let mut checksum = None;
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FormatError::InvalidXml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| FormatError::InvalidXml(e.to_string()))?;
        match attr.key.as_ref() {
            b"VALUE" => key_id = Some(parse_kid_value(&value)?),
            b"CHECKSUM" => checksum = Some(Checksum::from_base64(&value)?),
            b"ALGID" => merge_algorithm(algorithm, parse_algorithm(value.as_bytes())?)?,
            _ => {}
        }
    }
    let key_id = key_id.ok_or_else(|| FormatError::Malformed("<KID> without VALUE".into()))?;
    Ok(WrmKid::new(key_id, checksum))
}

fn parse_kid_value(value: &str) -> Result<KeyId, FormatError> {
    let bytes = BASE64
        .decode(value.trim().as_bytes())
        .map_err(|e| FormatError::InvalidBase64(format!("KID: {e}")))?;
    let bytes: [u8; 16] = bytes.as_slice().try_into().map_err(|_| {
        FormatError::Malformed(format!("KID is {} bytes, expected 16", bytes.len()))
    })?;
    Ok(KeyId::from_guid_bytes(bytes))
}

fn parse_algorithm(name: &[u8]) -> Result<Algorithm, FormatError> {
    Algorithm::from_name(name).ok_or_else(|| {
        FormatError::Malformed(format!(
            "unsupported ALGID '{}'",
            String::from_utf8_lossy(name)
        ))
    })
}

fn merge_algorithm(current: &mut Option<Algorithm>, next: Algorithm) -> Result<(), FormatError> {
    match current {
        Some(existing) if *existing != next => Err(FormatError::Malformed(format!(
            "mixed ALGID values {existing} and {next}"
        ))),
        _ => {
            *current = Some(next);
            Ok(())
        }
    }
}
