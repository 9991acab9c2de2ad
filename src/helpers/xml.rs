//! XML parsing utilities for the workbook parts of an `.xlsx` archive.
//! Provides an XML reader wrapper and helper traits for attribute and text processing.

use crate::error::CourtTallyError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),
}

/// XML reader wrapper configured for worksheet parsing
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Reads the next XML event, `None` at end of input.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, CourtTallyError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(CourtTallyError::XmlError(error)),
        }
    }
}

/// Helper trait for XML attributes
pub(crate) trait XmlAttributeHelper<'a> {
    /// Gets the unescaped attribute value as a string
    fn get_value(&self) -> Result<Cow<'a, str>, CourtTallyError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, CourtTallyError> {
        Ok(self.unescape_value()?)
    }
}

/// Helper trait for XML nodes providing attribute access
pub(crate) trait XmlNodeHelper<'a> {
    /// Gets an attribute value by name
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, CourtTallyError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, CourtTallyError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.get_value())
            .transpose()
    }
}

/// Helper trait for building text content from XML events
pub(crate) trait XmlTextContextHelper {
    /// Appends text content from a BytesRef event (entities and character references)
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), CourtTallyError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), CourtTallyError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = if let Some(hex) = number.strip_prefix('x') {
                u32::from_str_radix(hex, 16)?
            } else {
                number.parse::<u32>()?
            };
            if let Some(character) = std::char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }

        Ok(())
    }
}

#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_text(xml: &str) -> Result<(Option<String>, String), CourtTallyError> {
        let mut reader = XmlReader::new(xml.as_bytes());
        let mut name = None::<String>;
        let mut text = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name().as_ref() == b"c" => {
                name = event.get_attribute_value("r")?.map(|value| value.into_owned());
            }
            Event::Text(event) => text.push_str(&event.xml_content()?),
            Event::GeneralRef(event) => text.push_bytes_ref(&event)?,
        });
        Ok((name, text))
    }

    #[test]
    fn reads_attributes_and_entities() {
        let (name, text) = collect_text(r#"<c r="E3">Ann &amp; Bo &#x41;&#66;</c>"#).unwrap();
        assert_eq!(name.as_deref(), Some("E3"));
        assert_eq!(text, "Ann & Bo AB");
    }

    #[test]
    fn rejects_unknown_entity() {
        assert!(collect_text("<c>&shuttle;</c>").is_err());
    }
}
