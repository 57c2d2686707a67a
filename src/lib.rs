#![doc = include_str!("../README.md")]

pub mod array;
pub mod model;
pub mod parse;
pub mod prelude;
mod traits;
mod utils;
mod write_vtk;
pub mod writer;

pub use traits::{Array, Encode, ModelWriter, Numeric};

pub use model::{
    CellType, ElementRepository, Field, FieldPosition, FieldType, Group, Groups, Model,
    ModelError, NodeRepository, Tag, TagIndex, TagKind,
};

pub use writer::{
    AsciiWriter, Base64Writer, BinaryWriter, CollectionWriter, HeaderType, Precision,
    VtuWriter, WriterConfig,
};

pub use array::{AnyArray, ArrayData, DataType};
pub use write_vtk::Encoding;

pub use parse::{parse_vtu, read_vtu, UnstructuredGrid};

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),
    #[error("Error while parsing VTK xml: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Could not convert file to uf8 encoding: `{0}`")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("{bytes} bytes of array data do not fit a {header} block header")]
    HeaderOverflow { bytes: usize, header: &'static str },
}

/// Binary encoding marker type, arrays are written raw to an `AppendedData` section
#[derive(Debug, Clone, PartialEq)]
pub struct Binary;

/// base64 encoding marker type
#[derive(Debug, Clone)]
pub struct Base64;

/// ascii encoding marker type
#[derive(Debug, Clone, PartialEq)]
pub struct Ascii;

impl traits::Encode for Binary {
    fn encoding() -> Encoding {
        Encoding::Appended
    }
}

impl traits::Encode for Ascii {
    fn encoding() -> Encoding {
        Encoding::Ascii
    }
}

impl traits::Encode for Base64 {
    fn encoding() -> Encoding {
        Encoding::Base64
    }
}
