use crate::traits::{Array, Encode};
use crate::writer::{HeaderType, Piece};
use crate::Error;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::debug;

/// Write an unstructured grid holding a single piece to a `Writer`
pub(crate) fn write_vtk<W, E>(
    writer: &mut Writer<W>,
    piece: &Piece,
    header: HeaderType,
) -> Result<(), Error>
where
    W: Write,
    E: Encode,
{
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    open_element(
        writer,
        "VTKFile",
        &[
            ("type", "UnstructuredGrid"),
            ("version", "1.0"),
            ("byte_order", "LittleEndian"),
            ("header_type", header.as_str()),
        ],
    )?;

    open_element(writer, "UnstructuredGrid", &[])?;

    let points = piece.number_of_points().to_string();
    let cells = piece.number_of_cells().to_string();
    open_element(
        writer,
        "Piece",
        &[
            ("NumberOfPoints", points.as_str()),
            ("NumberOfCells", cells.as_str()),
        ],
    )?;

    // offsets of appended arrays count from the first byte after the `_` marker
    let mut offset = 0;

    for (section, arrays) in piece.sections() {
        open_element(writer, section, &[])?;

        for array in arrays {
            match E::encoding() {
                Encoding::Ascii => array.write_ascii(writer)?,
                Encoding::Base64 => array.write_base64(writer, header)?,
                Encoding::Appended => {
                    array.write_appended_header(writer, offset as u64)?;
                    offset += array.appended_size(header);
                }
            }
        }

        close_element(writer, section)?;
    }

    close_element(writer, "Piece")?;
    close_element(writer, "UnstructuredGrid")?;

    if E::is_binary() {
        debug!(bytes = offset, "writing appended data section");

        appended_binary_header_start(writer)?;

        for (_, arrays) in piece.sections() {
            for array in arrays {
                array.write_binary(writer, header)?;
            }
        }

        appended_binary_header_end(writer)?;
    }

    close_element(writer, "VTKFile")?;

    Ok(())
}

pub(crate) fn open_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), Error> {
    let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
    writer.write_event(Event::Start(start))?;
    Ok(())
}

pub(crate) fn empty_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), Error> {
    let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

pub(crate) fn close_element<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), Error> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn appended_binary_header_start<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    open_element(writer, "AppendedData", &[("encoding", "raw")])?;
    writer.inner().write_all(b"_")?;
    Ok(())
}

fn appended_binary_header_end<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    close_element(writer, "AppendedData")
}

/// the encoding to use when writing a dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Base64,
    Appended,
}

impl Encoding {
    /// value of the `format` attribute
    pub fn to_str(&self) -> &'static str {
        match &self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
            Self::Appended => "appended",
        }
    }
}

pub(crate) fn write_inline_array_header<W: Write, A: Array + ?Sized>(
    writer: &mut Writer<W>,
    array: &A,
    format: Encoding,
) -> Result<(), Error> {
    let components = array.components().to_string();

    open_element(
        writer,
        "DataArray",
        &[
            ("type", array.data_type().as_str()),
            ("Name", array.name()),
            ("NumberOfComponents", components.as_str()),
            ("format", format.to_str()),
        ],
    )
}

pub(crate) fn close_inline_array_header<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    close_element(writer, "DataArray")
}

/// write the header for an appended data array that will later be written in the appended
/// section of the vtk.
///
/// if you call this function you are also responsible for writing the binary data of the
/// array in the same order as the headers
pub(crate) fn write_appended_dataarray_header<W: Write, A: Array + ?Sized>(
    writer: &mut Writer<W>,
    array: &A,
    offset: u64,
) -> Result<(), Error> {
    let components = array.components().to_string();
    let offset = offset.to_string();

    empty_element(
        writer,
        "DataArray",
        &[
            ("type", array.data_type().as_str()),
            ("Name", array.name()),
            ("NumberOfComponents", components.as_str()),
            ("format", Encoding::Appended.to_str()),
            ("offset", offset.as_str()),
        ],
    )
}
