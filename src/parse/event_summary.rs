use super::error::ParsedNameOrBytes;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;

use std::fmt;

/// Short description of an xml event, for error messages
#[derive(Debug)]
pub(crate) struct EventSummary {
    name: Option<ParsedNameOrBytes>,
    e_type: &'static str,
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "element {name} with type {}", self.e_type),
            None => write!(f, "unnamed event with type {}", self.e_type),
        }
    }
}

impl EventSummary {
    pub(crate) fn new(e: &Event) -> Self {
        Self {
            name: e.event_name(),
            e_type: event_type(e),
        }
    }

    pub(crate) fn start(bytes: &BytesStart<'_>) -> Self {
        Self {
            name: bytes.event_name(),
            e_type: "start",
        }
    }

    pub(crate) fn end(bytes: &BytesEnd<'_>) -> Self {
        Self {
            name: bytes.event_name(),
            e_type: "end",
        }
    }

    /// the raw bytes following the `_` marker of an appended data section
    pub(crate) fn raw_bytes() -> Self {
        Self {
            name: None,
            e_type: "raw bytes",
        }
    }
}

pub(crate) trait ElementName {
    fn event_name(&self) -> Option<ParsedNameOrBytes>;
    fn byte_name(&self) -> Option<QName<'_>>;
}

impl ElementName for BytesStart<'_> {
    fn event_name(&self) -> Option<ParsedNameOrBytes> {
        Some(ParsedNameOrBytes::from(self.name()))
    }

    fn byte_name(&self) -> Option<QName<'_>> {
        Some(self.name())
    }
}

impl ElementName for BytesEnd<'_> {
    fn event_name(&self) -> Option<ParsedNameOrBytes> {
        Some(ParsedNameOrBytes::from(self.name()))
    }

    fn byte_name(&self) -> Option<QName<'_>> {
        Some(self.name())
    }
}

impl ElementName for Event<'_> {
    fn event_name(&self) -> Option<ParsedNameOrBytes> {
        self.byte_name().map(ParsedNameOrBytes::from)
    }

    fn byte_name(&self) -> Option<QName<'_>> {
        match &self {
            Event::Start(s) | Event::Empty(s) => s.byte_name(),
            Event::End(e) => e.byte_name(),
            _ => None,
        }
    }
}

fn event_type(event: &Event) -> &'static str {
    match event {
        Event::Start(_) => "start",
        Event::End(_) => "end",
        Event::Empty(_) => "empty",
        Event::Text(_) => "text",
        Event::Comment(_) => "comment",
        Event::CData(_) => "cdata",
        Event::Decl(_) => "decl",
        Event::PI(_) => "pi",
        Event::DocType(_) => "doctype",
        Event::Eof => "eof",
    }
}
