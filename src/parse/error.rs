use super::event_summary::EventSummary;

use derive_more::{Constructor, Display, From};
use quick_xml::name::QName;

/// Every way reading an unstructured grid file can fail, by the part of the file that was
/// being read
#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("Error parsing vtk file header: {0}")]
    Header(Header),
    #[error("Error parsing vtk file piece: {0}")]
    Piece(Piece),
    #[error("Error parsing vtk file appended data: {0}")]
    AppendedData(AppendedData),
    #[error("Error assembling unstructured grid: {0}")]
    Grid(InvalidGrid),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Header {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("{0}")]
    InvalidNumber(InvalidNumber),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Piece {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("{0}")]
    InvalidNumber(InvalidNumber),
    #[error("{0}")]
    InvalidBinary(InvalidBinary),
}

#[derive(Debug, thiserror::Error, From)]
pub enum AppendedData {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("{0}")]
    InvalidBinary(InvalidBinary),
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml element: {xml_err}")]
pub struct MalformedXml {
    xml_err: quick_xml::Error,
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml attribute: {att_err}")]
pub struct MalformedAttribute {
    att_err: quick_xml::events::attributes::AttrError,
}

#[derive(Display, Debug)]
#[display(fmt = "unexpected element. Expected `{expected_name}`, got {actual_element}")]
pub struct UnexpectedElement {
    expected_name: String,
    actual_element: EventSummary,
}

impl UnexpectedElement {
    pub(crate) fn new<T: Into<String>>(expected_name: T, actual_element: EventSummary) -> Self {
        Self {
            expected_name: expected_name.into(),
            actual_element,
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "unexpected attribute value for {attribute_name} in {element_name} element: expected {expected_value}, got {actual_value}"
)]
pub struct UnexpectedAttributeValue {
    pub(crate) element_name: String,
    pub(crate) attribute_name: String,
    pub(crate) expected_value: String,
    pub(crate) actual_value: ParsedNameOrBytes,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    element_name: String,
    attribute_name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "could not parse `{value}` as a number in {context}")]
pub struct InvalidNumber {
    context: String,
    value: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "invalid binary data for array `{array_name}`: {reason}")]
pub struct InvalidBinary {
    array_name: String,
    reason: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{reason}")]
pub struct InvalidGrid {
    reason: String,
}

#[derive(Display, Debug)]
pub enum ParsedNameOrBytes {
    #[display(fmt = "{_0}")]
    Utf8(String),
    #[display(fmt = "{_0:?} (cannot convert to UTF8 string)")]
    Bytes(Vec<u8>),
}

impl ParsedNameOrBytes {
    fn new(bytes: &[u8]) -> Self {
        let vec = Vec::from(bytes);
        match String::from_utf8(vec) {
            Ok(string) => Self::Utf8(string),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl<'a> From<QName<'a>> for ParsedNameOrBytes {
    fn from(x: QName) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<std::borrow::Cow<'a, [u8]>> for ParsedNameOrBytes {
    fn from(x: std::borrow::Cow<'a, [u8]>) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<&'a str> for ParsedNameOrBytes {
    fn from(x: &str) -> Self {
        Self::Utf8(x.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Piece::from(InvalidNumber::new("array `offsets`".into(), "4x".into()));
        assert_eq!(
            err.to_string(),
            "could not parse `4x` as a number in array `offsets`"
        );

        let err = ParseError::from(Header::from(UnexpectedAttributeValue::new(
            "VTKFile".into(),
            "type".into(),
            "UnstructuredGrid".into(),
            ParsedNameOrBytes::from("PolyData"),
        )));
        assert!(err.to_string().contains("expected UnstructuredGrid, got PolyData"));

        let bytes = ParsedNameOrBytes::from(std::borrow::Cow::Borrowed(&[0xff, 0xfe][..]));
        assert!(matches!(bytes, ParsedNameOrBytes::Bytes(_)));
    }
}
