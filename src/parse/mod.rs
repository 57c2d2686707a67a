//! reading and parsing unstructured grid (`.vtu`) files
//!
//! The reader accepts single piece files in any of the encodings the writers produce
//! (`ascii`, inline base64 `binary` and raw `appended` data) and is mostly used to check
//! files after they have been written:
//!
//! ```no_run
//! let grid = fem_vtk::parse::read_vtu("vtk_files/MODEL NAME/PART NAME.vtu").unwrap();
//!
//! for cell in 0..grid.number_of_cells {
//!     println!("{:?}", grid.cell_node_tags(cell));
//! }
//! ```

mod error;
mod event_summary;

pub use error::ParseError;
use event_summary::EventSummary;

use crate::array::DataType;
use crate::utils;
use crate::writer::{HeaderType, ELEMENT_TAGS, NODE_TAGS};
use crate::Error;

use ndarray::Array2;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

/// Values of a data array, widened to 64 bits
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Float(values) => values.len(),
            Values::Int(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named data array read from a file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArray {
    pub name: String,
    pub data_type: DataType,
    pub components: usize,
    pub values: Values,
}

impl ParsedArray {
    /// every value as a float
    pub fn floats(&self) -> Vec<f64> {
        match &self.values {
            Values::Float(values) => values.clone(),
            Values::Int(values) => values.iter().map(|v| *v as f64).collect(),
        }
    }

    /// the values of an integer array
    pub fn ints(&self) -> Option<&[i64]> {
        match &self.values {
            Values::Int(values) => Some(values),
            Values::Float(_) => None,
        }
    }

    /// number of tuples in the array
    pub fn tuples(&self) -> usize {
        self.values.len() / self.components.max(1)
    }
}

/// The single piece of an unstructured grid file
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredGrid {
    pub header_type: HeaderType,
    pub number_of_points: usize,
    pub number_of_cells: usize,
    /// `(points, 3)` coordinates
    pub points: Array2<f64>,
    pub connectivity: Vec<i64>,
    pub offsets: Vec<i64>,
    pub types: Vec<u8>,
    pub point_data: Vec<ParsedArray>,
    pub cell_data: Vec<ParsedArray>,
}

impl UnstructuredGrid {
    /// local point indices of the cell at `index`
    pub fn cell(&self, index: usize) -> Option<&[i64]> {
        let end = *self.offsets.get(index)?;
        let start = match index {
            0 => 0,
            _ => *self.offsets.get(index - 1)?,
        };

        self.connectivity
            .get(usize::try_from(start).ok()?..usize::try_from(end).ok()?)
    }

    pub fn point_array(&self, name: &str) -> Option<&ParsedArray> {
        self.point_data.iter().find(|array| array.name == name)
    }

    pub fn cell_array(&self, name: &str) -> Option<&ParsedArray> {
        self.cell_data.iter().find(|array| array.name == name)
    }

    /// node tags stored along with the points
    pub fn node_tags(&self) -> Option<&[i64]> {
        self.point_array(NODE_TAGS)?.ints()
    }

    /// element tags stored along with the cells
    pub fn element_tags(&self) -> Option<&[i64]> {
        self.cell_array(ELEMENT_TAGS)?.ints()
    }

    /// the connectivity of the cell at `index` expressed in node tags
    pub fn cell_node_tags(&self, index: usize) -> Option<Vec<i64>> {
        let tags = self.node_tags()?;

        self.cell(index)?
            .iter()
            .map(|local| tags.get(usize::try_from(*local).ok()?).copied())
            .collect()
    }
}

/// read in and parse an entire unstructured grid file for a given path
pub fn read_vtu<P: AsRef<Path>>(path: P) -> Result<UnstructuredGrid, Error> {
    let bytes = std::fs::read(path)?;
    parse_vtu(&bytes)
}

/// parse an unstructured grid file held in memory
pub fn parse_vtu(bytes: &[u8]) -> Result<UnstructuredGrid, Error> {
    let mut reader = Reader::from_reader(bytes);
    let mut buffer = Vec::new();

    // ignore whitespace in the reader
    reader.trim_text(true);

    let header_type = read_to_grid_header(&mut reader, &mut buffer).map_err(ParseError::from)?;

    let (number_of_points, number_of_cells) =
        read_piece_header(&mut reader, &mut buffer).map_err(ParseError::from)?;

    let mut sections = Sections::default();
    read_sections(&mut reader, &mut buffer, header_type, &mut sections)
        .map_err(ParseError::from)?;

    let has_appended = sections
        .all()
        .any(|array| matches!(array.data, RawData::Appended(_)));

    if has_appended {
        read_to_appended_data(&mut reader, &mut buffer).map_err(ParseError::from)?;

        // everything after the `>` of the AppendedData element is raw bytes
        let raw: &[u8] = *reader.get_mut();
        let raw = strip_appended_marker(raw).map_err(ParseError::from)?;

        debug!(bytes = raw.len(), "resolving appended arrays");

        sections
            .all_mut()
            .try_for_each(|array| array.resolve_appended(raw, header_type))
            .map_err(ParseError::from)?;
    }

    let grid = assemble_grid(header_type, number_of_points, number_of_cells, sections)
        .map_err(ParseError::from)?;

    Ok(grid)
}

#[derive(Debug, Default)]
struct Sections {
    points: Vec<RawArray>,
    cells: Vec<RawArray>,
    point_data: Vec<RawArray>,
    cell_data: Vec<RawArray>,
}

impl Sections {
    fn all(&self) -> impl Iterator<Item = &RawArray> {
        self.points
            .iter()
            .chain(&self.cells)
            .chain(&self.point_data)
            .chain(&self.cell_data)
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut RawArray> {
        self.points
            .iter_mut()
            .chain(&mut self.cells)
            .chain(&mut self.point_data)
            .chain(&mut self.cell_data)
    }
}

#[derive(Debug)]
enum RawData {
    Parsed(Values),
    /// offset into the appended section
    Appended(u64),
}

#[derive(Debug)]
struct RawArray {
    name: String,
    data_type: DataType,
    components: usize,
    data: RawData,
}

impl RawArray {
    fn resolve_appended(
        &mut self,
        raw: &[u8],
        header: HeaderType,
    ) -> Result<(), error::AppendedData> {
        let offset = match self.data {
            RawData::Appended(offset) => offset,
            RawData::Parsed(_) => return Ok(()),
        };

        let block = usize::try_from(offset)
            .ok()
            .and_then(|offset| raw.get(offset..))
            .ok_or_else(|| {
                error::InvalidBinary::new(
                    self.name.clone(),
                    format!("offset {offset} is past the end of the appended data"),
                )
            })?;

        let values = decode_block(block, header, self.data_type, &self.name)?;
        self.data = RawData::Parsed(values);

        Ok(())
    }

    fn into_parsed(self) -> Result<ParsedArray, error::InvalidGrid> {
        match self.data {
            RawData::Parsed(values) => Ok(ParsedArray {
                name: self.name,
                data_type: self.data_type,
                components: self.components,
                values,
            }),
            RawData::Appended(_) => Err(error::InvalidGrid::new(format!(
                "array `{}` was never read from the appended data",
                self.name
            ))),
        }
    }
}

/// Read up to (and including) the opening `UnstructuredGrid` element, return the header
/// type declared by the file
fn read_to_grid_header<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<HeaderType, error::Header> {
    // find a VTKFile leading element
    let vtk_file = loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match event {
            // sometimes there are headers for type of file, we just continue
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) => continue,
            Event::Start(start) if start.name() == QName(b"VTKFile") => break start,
            other => {
                let actual_event = EventSummary::new(&other);
                return Err(error::UnexpectedElement::new("VTKFile", actual_event).into());
            }
        }
    };

    let mut header_type = HeaderType::UInt32;

    for attribute in vtk_file.attributes() {
        let attribute = attribute.map_err(error::MalformedAttribute::from)?;

        match attribute.key {
            QName(b"type") => {
                check_attribute_value(attribute, "VTKFile", "type", "UnstructuredGrid")?
            }
            QName(b"byte_order") => {
                check_attribute_value(attribute, "VTKFile", "byte_order", "LittleEndian")?
            }
            QName(b"header_type") => {
                let value = attribute.value.clone();
                header_type = std::str::from_utf8(&value)
                    .ok()
                    .and_then(HeaderType::from_name)
                    .ok_or_else(|| {
                        error::UnexpectedAttributeValue::new(
                            "VTKFile".into(),
                            "header_type".into(),
                            "UInt32 or UInt64".into(),
                            value.into(),
                        )
                    })?;
            }
            QName(b"compressor") => {
                return Err(error::UnexpectedAttributeValue::new(
                    "VTKFile".into(),
                    "compressor".into(),
                    "no compression".into(),
                    attribute.value.into(),
                )
                .into())
            }
            _ => (),
        }
    }

    read_starting_element_with_name::<error::Header, _>(reader, buffer, "UnstructuredGrid")?;

    Ok(header_type)
}

/// read the `Piece` element, return the number of points and cells it declares
fn read_piece_header<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<(usize, usize), error::Header> {
    let piece = read_starting_element_with_name::<error::Header, _>(reader, buffer, "Piece")?;

    let points = get_attribute_value::<error::Header>(&piece, "NumberOfPoints", "Piece")?;
    let points = parse_number(&points.value, "attribute NumberOfPoints")?;

    let cells = get_attribute_value::<error::Header>(&piece, "NumberOfCells", "Piece")?;
    let cells = parse_number(&cells.value, "attribute NumberOfCells")?;

    Ok((points, cells))
}

/// read every section of the piece up to and including the closing `Piece` element
fn read_sections<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    header_type: HeaderType,
    sections: &mut Sections,
) -> Result<(), error::Piece> {
    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        let (name, is_empty) = match &event {
            Event::Start(start) => (start.name().as_ref().to_vec(), false),
            Event::Empty(start) => (start.name().as_ref().to_vec(), true),
            Event::End(end) if end.name() == QName(b"Piece") => return Ok(()),
            other => {
                let actual = EventSummary::new(other);
                return Err(error::UnexpectedElement::new(
                    "Points, Cells, PointData, CellData or /Piece",
                    actual,
                )
                .into());
            }
        };

        let target = match name.as_slice() {
            b"Points" => &mut sections.points,
            b"Cells" => &mut sections.cells,
            b"PointData" => &mut sections.point_data,
            b"CellData" => &mut sections.cell_data,
            _ => {
                let actual = EventSummary::new(&event);
                return Err(error::UnexpectedElement::new(
                    "Points, Cells, PointData, CellData or /Piece",
                    actual,
                )
                .into());
            }
        };

        if is_empty {
            continue;
        }

        // the name is valid utf8, it matched one of the section names
        let section = String::from_utf8_lossy(&name).into_owned();
        read_section_arrays(reader, buffer, header_type, &section, target)?;
    }
}

/// read `DataArray` elements until the closing element of `section`
fn read_section_arrays<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    header_type: HeaderType,
    section: &str,
    arrays: &mut Vec<RawArray>,
) -> Result<(), error::Piece> {
    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        let (header, was_empty) = match &event {
            Event::End(end) if end.name().as_ref() == section.as_bytes() => return Ok(()),
            Event::Start(start) if start.name() == QName(b"DataArray") => {
                (read_dataarray_header(start)?, false)
            }
            Event::Empty(start) if start.name() == QName(b"DataArray") => {
                (read_dataarray_header(start)?, true)
            }
            other => {
                let actual = EventSummary::new(other);
                let expected = format!("DataArray or /{section}");
                return Err(error::UnexpectedElement::new(expected, actual).into());
            }
        };

        let data = match header.format {
            ArrayFormat::Appended(offset) => {
                if !was_empty {
                    read_ending_element::<error::Piece, _>(reader, buffer, "DataArray")?;
                }
                RawData::Appended(offset)
            }
            ArrayFormat::Ascii | ArrayFormat::Base64 if was_empty => {
                RawData::Parsed(empty_values(header.data_type))
            }
            ArrayFormat::Ascii | ArrayFormat::Base64 => {
                let values = read_inline_values(reader, buffer, header_type, &header)?;
                RawData::Parsed(values)
            }
        };

        arrays.push(RawArray {
            name: header.name,
            data_type: header.data_type,
            components: header.components,
            data,
        });
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// Describes where the values of an array are stored
enum ArrayFormat {
    /// values are contained directly within the `DataArray` element as text
    Ascii,
    /// values are base64 encoded directly within the `DataArray` element
    Base64,
    /// values are stored at a specified offset in the `AppendedData` section
    Appended(u64),
}

#[derive(Debug, Clone)]
struct DataArrayHeader {
    name: String,
    data_type: DataType,
    components: usize,
    format: ArrayFormat,
}

fn read_dataarray_header(start: &BytesStart<'_>) -> Result<DataArrayHeader, error::Piece> {
    let name = get_attribute_value::<error::Piece>(start, "Name", "DataArray")?;
    let name = name
        .unescape_value()
        .map_err(error::MalformedXml::from)?
        .into_owned();

    let data_type = get_attribute_value::<error::Piece>(start, "type", "DataArray")?;
    let data_type = std::str::from_utf8(&data_type.value)
        .ok()
        .and_then(DataType::from_name)
        .ok_or_else(|| {
            error::UnexpectedAttributeValue::new(
                "DataArray".into(),
                "type".into(),
                "a VTK data type".into(),
                data_type.value.clone().into(),
            )
        })?;

    // the number of components defaults to one when it is missing
    let components =
        match get_attribute_value::<error::Piece>(start, "NumberOfComponents", "DataArray") {
            Ok(attribute) => parse_number(&attribute.value, "attribute NumberOfComponents")?,
            Err(_) => 1,
        };

    let format = get_attribute_value::<error::Piece>(start, "format", "DataArray")?;

    let format = match format.value.as_ref() {
        b"ascii" => ArrayFormat::Ascii,
        b"binary" => ArrayFormat::Base64,
        b"appended" => {
            let offset = get_attribute_value::<error::Piece>(start, "offset", "DataArray")?;
            ArrayFormat::Appended(parse_number(&offset.value, "attribute offset")?)
        }
        _ => {
            return Err(error::UnexpectedAttributeValue::new(
                "DataArray".into(),
                "format".into(),
                "ascii, binary or appended".into(),
                format.value.clone().into(),
            )
            .into())
        }
    };

    Ok(DataArrayHeader {
        name,
        data_type,
        components,
        format,
    })
}

/// read the body of an inline array and the closing `DataArray` element
fn read_inline_values<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    header_type: HeaderType,
    header: &DataArrayHeader,
) -> Result<Values, error::Piece> {
    buffer.clear();
    let event = reader
        .read_event_into(buffer)
        .map_err(error::MalformedXml::from)?;

    let values = match event {
        Event::Text(text) => {
            let text = text.unescape().map_err(error::MalformedXml::from)?;

            match header.format {
                ArrayFormat::Ascii => parse_ascii(&text, header)?,
                _ => parse_base64(&text, header_type, header)?,
            }
        }
        // `<DataArray ...></DataArray>` holds no values
        Event::End(end) if end.name() == QName(b"DataArray") => {
            return Ok(empty_values(header.data_type))
        }
        other => {
            let actual = EventSummary::new(&other);
            return Err(error::UnexpectedElement::new("DataArray body", actual).into());
        }
    };

    read_ending_element::<error::Piece, _>(reader, buffer, "DataArray")?;

    Ok(values)
}

fn parse_ascii(text: &str, header: &DataArrayHeader) -> Result<Values, error::InvalidNumber> {
    let invalid = |value: &str| {
        error::InvalidNumber::new(format!("array `{}`", header.name), value.into())
    };

    let words = text.split_ascii_whitespace();

    let values = if header.data_type.is_float() {
        Values::Float(
            words
                .map(|x| x.parse::<f64>().map_err(|_| invalid(x)))
                .collect::<Result<_, _>>()?,
        )
    } else {
        Values::Int(
            words
                .map(|x| x.parse::<i64>().map_err(|_| invalid(x)))
                .collect::<Result<_, _>>()?,
        )
    };

    Ok(values)
}

/// decode an inline base64 array: a block header followed by the values, encoded together
fn parse_base64(
    text: &str,
    header_type: HeaderType,
    header: &DataArrayHeader,
) -> Result<Values, error::Piece> {
    let cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = base64::decode(cleaned).map_err(|e| {
        error::InvalidBinary::new(header.name.clone(), format!("bad base64 data: {e}"))
    })?;

    let values = decode_block(&bytes, header_type, header.data_type, &header.name)?;

    Ok(values)
}

/// decode one `[byte count][values]` block from the start of `block`
fn decode_block(
    block: &[u8],
    header: HeaderType,
    data_type: DataType,
    array_name: &str,
) -> Result<Values, error::InvalidBinary> {
    let size = header.size();

    let announced = utils::header_value(block, size).ok_or_else(|| {
        error::InvalidBinary::new(array_name.into(), "block header is truncated".into())
    })?;

    let ends_early = || {
        error::InvalidBinary::new(
            array_name.into(),
            format!("block announces {announced} bytes, but the data ends early"),
        )
    };

    let num_bytes = usize::try_from(announced).map_err(|_| ends_early())?;
    let end = size.checked_add(num_bytes).ok_or_else(ends_early)?;

    let data = block.get(size..end).ok_or_else(|| {
        error::InvalidBinary::new(
            array_name.into(),
            format!("block announces {num_bytes} bytes, but the data ends early"),
        )
    })?;

    if num_bytes % data_type.size() != 0 {
        return Err(error::InvalidBinary::new(
            array_name.into(),
            format!(
                "{num_bytes} bytes do not make up whole {} values",
                data_type.as_str()
            ),
        ));
    }

    decode_values(data, data_type, array_name)
}

fn decode_values(
    data: &[u8],
    data_type: DataType,
    array_name: &str,
) -> Result<Values, error::InvalidBinary> {
    fn widen<T: Into<i64>>(values: Vec<T>) -> Values {
        Values::Int(values.into_iter().map(Into::into).collect())
    }

    let values = match data_type {
        DataType::Float64 => Values::Float(utils::decode_le::<f64, 8>(data)),
        DataType::Float32 => Values::Float(
            utils::decode_le::<f32, 4>(data)
                .into_iter()
                .map(f64::from)
                .collect(),
        ),
        DataType::Int8 => widen(utils::decode_le::<i8, 1>(data)),
        DataType::UInt8 => widen(utils::decode_le::<u8, 1>(data)),
        DataType::Int16 => widen(utils::decode_le::<i16, 2>(data)),
        DataType::UInt16 => widen(utils::decode_le::<u16, 2>(data)),
        DataType::Int32 => widen(utils::decode_le::<i32, 4>(data)),
        DataType::UInt32 => widen(utils::decode_le::<u32, 4>(data)),
        DataType::Int64 => Values::Int(utils::decode_le::<i64, 8>(data)),
        DataType::UInt64 => Values::Int(
            utils::decode_le::<u64, 8>(data)
                .into_iter()
                .map(i64::try_from)
                .collect::<Result<_, _>>()
                .map_err(|_| {
                    error::InvalidBinary::new(
                        array_name.into(),
                        "UInt64 value does not fit a 64 bit signed integer".into(),
                    )
                })?,
        ),
    };

    Ok(values)
}

fn empty_values(data_type: DataType) -> Values {
    if data_type.is_float() {
        Values::Float(Vec::new())
    } else {
        Values::Int(Vec::new())
    }
}

/// read the closing `UnstructuredGrid` element and the opening `AppendedData` element
fn read_to_appended_data<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<(), error::AppendedData> {
    read_ending_element::<error::AppendedData, _>(reader, buffer, "UnstructuredGrid")?;

    let appended_data =
        read_starting_element_with_name::<error::AppendedData, _>(reader, buffer, "AppendedData")?;

    let encoding =
        get_attribute_value::<error::AppendedData>(&appended_data, "encoding", "AppendedData")?;

    check_attribute_value(encoding, "AppendedData", "encoding", "raw")?;

    Ok(())
}

/// skip the whitespace and the `_` marker in front of the appended bytes
fn strip_appended_marker(raw: &[u8]) -> Result<&[u8], error::AppendedData> {
    let start = raw.iter().position(|b| !b.is_ascii_whitespace());

    match start {
        Some(start) if raw[start] == b'_' => Ok(&raw[start + 1..]),
        _ => {
            let actual = EventSummary::raw_bytes();
            Err(error::UnexpectedElement::new("_", actual).into())
        }
    }
}

fn assemble_grid(
    header_type: HeaderType,
    number_of_points: usize,
    number_of_cells: usize,
    sections: Sections,
) -> Result<UnstructuredGrid, error::InvalidGrid> {
    let invalid = |reason: String| error::InvalidGrid::new(reason);

    let mut points = sections.points.into_iter();
    let points = match (points.next(), points.next()) {
        (Some(array), None) => array.into_parsed()?,
        _ => return Err(invalid("expected exactly one array in Points".into())),
    };

    let expected_values = number_of_points
        .checked_mul(3)
        .ok_or_else(|| invalid(format!("{number_of_points} points cannot be addressed")))?;

    if points.components != 3 || points.values.len() != expected_values {
        return Err(invalid(format!(
            "Points array holds {} values in {} components, expected {} points in 3d",
            points.values.len(),
            points.components,
            number_of_points
        )));
    }

    let points = Array2::from_shape_vec((number_of_points, 3), points.floats())
        .map_err(|e| invalid(format!("Points array: {e}")))?;

    let mut connectivity = None;
    let mut offsets = None;
    let mut types = None;

    for array in sections.cells {
        let array = array.into_parsed()?;
        let ints = array
            .ints()
            .ok_or_else(|| invalid(format!("cell array `{}` is not an integer array", array.name)))?
            .to_vec();

        match array.name.as_str() {
            "connectivity" => connectivity = Some(ints),
            "offsets" => offsets = Some(ints),
            "types" => types = Some(ints),
            other => return Err(invalid(format!("unexpected cell array `{other}`"))),
        }
    }

    let connectivity = connectivity.ok_or_else(|| invalid("missing connectivity array".into()))?;
    let offsets = offsets.ok_or_else(|| invalid("missing offsets array".into()))?;
    let types = types.ok_or_else(|| invalid("missing types array".into()))?;

    if offsets.len() != number_of_cells || types.len() != number_of_cells {
        return Err(invalid(format!(
            "{} offsets and {} types for {number_of_cells} cells",
            offsets.len(),
            types.len()
        )));
    }

    let types = types
        .into_iter()
        .map(u8::try_from)
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| invalid("cell type code out of range".into()))?;

    let point_data = sections
        .point_data
        .into_iter()
        .map(RawArray::into_parsed)
        .collect::<Result<_, _>>()?;

    let cell_data = sections
        .cell_data
        .into_iter()
        .map(RawArray::into_parsed)
        .collect::<Result<_, _>>()?;

    Ok(UnstructuredGrid {
        header_type,
        number_of_points,
        number_of_cells,
        points,
        connectivity,
        offsets,
        types,
        point_data,
        cell_data,
    })
}

fn parse_number<T: std::str::FromStr>(
    value: &[u8],
    context: &str,
) -> Result<T, error::InvalidNumber> {
    let text = String::from_utf8_lossy(value);
    text.trim()
        .parse()
        .map_err(|_| error::InvalidNumber::new(context.into(), text.into_owned()))
}

fn read_starting_element_with_name<'a, E, R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &'a mut Vec<u8>,
    expected_name: &str,
) -> Result<BytesStart<'a>, E>
where
    E: From<error::UnexpectedElement> + From<error::MalformedXml>,
{
    buffer.clear();
    let element = reader
        .read_event_into(buffer)
        .map_err(error::MalformedXml::from)?;

    let event = if let Event::Start(event) = element {
        event
    } else {
        let actual_event = EventSummary::new(&element);
        let unexpected = error::UnexpectedElement::new(expected_name, actual_event);
        return Err(E::from(unexpected));
    };

    // check that the name of the element is correct
    if event.name().as_ref() != expected_name.as_bytes() {
        let actual_event = EventSummary::start(&event);
        let unexpected = error::UnexpectedElement::new(expected_name, actual_event);
        return Err(E::from(unexpected));
    }

    Ok(event)
}

fn read_ending_element<E, R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    expected_name: &str,
) -> Result<(), E>
where
    E: From<error::UnexpectedElement> + From<error::MalformedXml>,
{
    buffer.clear();
    let element = reader
        .read_event_into(buffer)
        .map_err(error::MalformedXml::from)?;

    let event = if let Event::End(event) = element {
        event
    } else {
        let actual_event = EventSummary::new(&element);
        let unexpected = error::UnexpectedElement::new(format!("/{expected_name}"), actual_event);
        return Err(E::from(unexpected));
    };

    if event.name().as_ref() != expected_name.as_bytes() {
        let actual_event = EventSummary::end(&event);
        let unexpected = error::UnexpectedElement::new(format!("/{expected_name}"), actual_event);
        return Err(E::from(unexpected));
    }

    Ok(())
}

fn get_attribute_value<'a, E>(
    bytes_start: &'a BytesStart<'_>,
    attribute_key: &str,
    element_name: &str,
) -> Result<Attribute<'a>, E>
where
    E: From<error::MissingAttribute> + From<error::MalformedAttribute>,
{
    // find the `attribute_key` attribute on the `element_name` element
    for attribute in bytes_start.attributes() {
        let attribute = attribute.map_err(error::MalformedAttribute::from)?;

        if attribute.key.as_ref() == attribute_key.as_bytes() {
            return Ok(attribute);
        }
    }

    let err = error::MissingAttribute::new(element_name.into(), attribute_key.into());
    Err(E::from(err))
}

/// ensure that an attribute's value is what we expect it to be, otherwise return an error with
/// some location information
fn check_attribute_value(
    att: Attribute<'_>,
    element_name: &str,
    attribute_name: &str,
    expected_attribute_value: &str,
) -> Result<(), error::UnexpectedAttributeValue> {
    if att.value.as_ref() != expected_attribute_value.as_bytes() {
        let unexpected_value = error::UnexpectedAttributeValue {
            element_name: element_name.into(),
            attribute_name: attribute_name.into(),
            expected_value: expected_attribute_value.into(),
            actual_value: error::ParsedNameOrBytes::from(att.value),
        };

        Err(unexpected_value)
    } else {
        Ok(())
    }
}
