/*!
    quick-xml helpers shared by the CPIX element writers.
*/

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::CpixResult;

pub const CPIX_NS: &str = "urn:dashif:org:cpix";
pub const PSKC_NS: &str = "urn:ietf:params:xml:ns:keyprov:pskc";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub(crate) fn start<W: Write>(writer: &mut Writer<W>, elem: BytesStart<'_>) -> CpixResult<()> {
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

pub(crate) fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> CpixResult<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub(crate) fn empty<W: Write>(writer: &mut Writer<W>, elem: BytesStart<'_>) -> CpixResult<()> {
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/**
    `<name>text</name>`
*/
pub(crate) fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> CpixResult<()> {
    start(writer, BytesStart::new(name))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

pub(crate) const fn encode_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/**
    Local part of a possibly prefixed element or attribute name.
*/
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
