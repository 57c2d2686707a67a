//! container types for data to be written to files

mod data_array;

pub use data_array::ArrayData;

use crate::traits::Array;
use crate::writer::HeaderType;
use crate::Error;

use quick_xml::Writer;
use std::io::Write;

/// The value types a `DataArray` can hold, named as in the `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int8 => "Int8",
            DataType::UInt8 => "UInt8",
            DataType::Int16 => "Int16",
            DataType::UInt16 => "UInt16",
            DataType::Int32 => "Int32",
            DataType::UInt32 => "UInt32",
            DataType::Int64 => "Int64",
            DataType::UInt64 => "UInt64",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
        }
    }

    /// parse the value of a `type` attribute
    pub fn from_name(name: &str) -> Option<Self> {
        let data_type = match name {
            "Int8" => DataType::Int8,
            "UInt8" => DataType::UInt8,
            "Int16" => DataType::Int16,
            "UInt16" => DataType::UInt16,
            "Int32" => DataType::Int32,
            "UInt32" => DataType::UInt32,
            "Int64" => DataType::Int64,
            "UInt64" => DataType::UInt64,
            "Float32" => DataType::Float32,
            "Float64" => DataType::Float64,
            _ => return None,
        };

        Some(data_type)
    }

    /// number of bytes of a single value
    pub fn size(&self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }
}

/// An array of any of the value types the writers produce
#[derive(Debug, Clone, PartialEq)]
pub enum AnyArray {
    Float64(ArrayData<f64>),
    Float32(ArrayData<f32>),
    Int64(ArrayData<i64>),
    UInt8(ArrayData<u8>),
}

macro_rules! dispatch {
    ($self:ident, $array:ident => $call:expr) => {
        match $self {
            AnyArray::Float64($array) => $call,
            AnyArray::Float32($array) => $call,
            AnyArray::Int64($array) => $call,
            AnyArray::UInt8($array) => $call,
        }
    };
}

impl Array for AnyArray {
    fn write_ascii<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        dispatch!(self, array => array.write_ascii(writer))
    }

    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        header: HeaderType,
    ) -> Result<(), Error> {
        dispatch!(self, array => array.write_base64(writer, header))
    }

    fn write_appended_header<W: Write>(
        &self,
        writer: &mut Writer<W>,
        offset: u64,
    ) -> Result<(), Error> {
        dispatch!(self, array => array.write_appended_header(writer, offset))
    }

    fn write_binary<W: Write>(
        &self,
        writer: &mut Writer<W>,
        header: HeaderType,
    ) -> Result<(), Error> {
        dispatch!(self, array => array.write_binary(writer, header))
    }

    fn name(&self) -> &str {
        dispatch!(self, array => array.name())
    }

    fn length(&self) -> usize {
        dispatch!(self, array => array.length())
    }

    fn components(&self) -> usize {
        dispatch!(self, array => array.components())
    }

    fn data_type(&self) -> DataType {
        dispatch!(self, array => array.data_type())
    }
}

impl From<ArrayData<f64>> for AnyArray {
    fn from(array: ArrayData<f64>) -> Self {
        AnyArray::Float64(array)
    }
}

impl From<ArrayData<f32>> for AnyArray {
    fn from(array: ArrayData<f32>) -> Self {
        AnyArray::Float32(array)
    }
}

impl From<ArrayData<i64>> for AnyArray {
    fn from(array: ArrayData<i64>) -> Self {
        AnyArray::Int64(array)
    }
}

impl From<ArrayData<u8>> for AnyArray {
    fn from(array: ArrayData<u8>) -> Self {
        AnyArray::UInt8(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        for data_type in [
            DataType::UInt8,
            DataType::Int32,
            DataType::Int64,
            DataType::UInt64,
            DataType::Float32,
            DataType::Float64,
        ] {
            assert_eq!(DataType::from_name(data_type.as_str()), Some(data_type));
        }
        assert_eq!(DataType::from_name("Float128"), None);
        assert_eq!(DataType::Float32.size(), 4);
    }

    #[test]
    fn dispatch_to_inner() {
        let array = AnyArray::from(ArrayData::new("types", vec![9u8, 9, 5], 1));
        assert_eq!(array.name(), "types");
        assert_eq!(array.length(), 3);
        assert_eq!(array.data_type(), DataType::UInt8);
        assert_eq!(array.appended_size(HeaderType::UInt64), 8 + 3);
        assert_eq!(array.appended_size(HeaderType::UInt32), 4 + 3);
    }
}
