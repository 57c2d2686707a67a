//! # Traits
//!
//! The seams between the mesh model, the typed data arrays and the file writers. Numeric
//! types that can be stored in a file implement [`Numeric`], anything that can be written
//! as a `DataArray` element implements [`Array`], the encoding marker types implement
//! [`Encode`], and every file writer implements [`ModelWriter`].

use crate::array::DataType;
use crate::model::Model;
use crate::write_vtk::Encoding;
use crate::writer::HeaderType;
use crate::Error;

use num_traits::ToBytes;
use quick_xml::Writer;
use std::io::Write;
use std::path::PathBuf;

/// A number that can be stored in a `DataArray`
pub trait Numeric: Copy + ToBytes {
    /// number of bytes of one value in binary form
    const SIZE: usize;

    /// the `type` attribute of arrays holding this number
    fn as_data_type() -> DataType;

    /// append the ascii representation of the number followed by a space
    fn push_ascii(&self, out: &mut String);

    /// append the little endian bytes of the number
    fn extend_le_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(self.to_le_bytes().as_ref());
    }
}

macro_rules! numeric_float {
    ($num:ty, $data_type:expr) => {
        impl Numeric for $num {
            const SIZE: usize = std::mem::size_of::<$num>();

            fn as_data_type() -> DataType {
                $data_type
            }

            fn push_ascii(&self, out: &mut String) {
                // shortest representation that parses back to the same value
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(*self));
                out.push(' ');
            }
        }
    };
}

macro_rules! numeric_int {
    ($num:ty, $data_type:expr) => {
        impl Numeric for $num {
            const SIZE: usize = std::mem::size_of::<$num>();

            fn as_data_type() -> DataType {
                $data_type
            }

            fn push_ascii(&self, out: &mut String) {
                out.push_str(&self.to_string());
                out.push(' ');
            }
        }
    };
}

numeric_float!(f64, DataType::Float64);
numeric_float!(f32, DataType::Float32);
numeric_int!(i64, DataType::Int64);
numeric_int!(u8, DataType::UInt8);

/// Describes how a named array of values is written to a vtk file
///
/// There are two ways an array can end up in a file: inline within the `DataArray` element
/// (as ascii text or base64 encoded bytes), or as raw bytes in the `AppendedData` section
/// at the end of the file. In the latter case only the element header with an `offset` is
/// written where the array lives in the document, and `write_binary` is called later, in
/// the same order as the headers were written.
pub trait Array {
    /// write the full `DataArray` element with whitespace separated values
    fn write_ascii<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error>;

    /// write the full `DataArray` element with the byte count header and the values
    /// encoded together as base64
    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        header: HeaderType,
    ) -> Result<(), Error>;

    /// write an empty `DataArray` element pointing at `offset` in the appended section
    fn write_appended_header<W: Write>(
        &self,
        writer: &mut Writer<W>,
        offset: u64,
    ) -> Result<(), Error>;

    /// write the byte count header and the raw little endian values to the appended section
    ///
    /// You must ensure that you have called `write_appended_header` with the correct offset
    /// before calling this function.
    fn write_binary<W: Write>(&self, writer: &mut Writer<W>, header: HeaderType)
        -> Result<(), Error>;

    /// name of the array in the file
    fn name(&self) -> &str;

    /// number of values, counting every component
    fn length(&self) -> usize;

    fn components(&self) -> usize {
        1
    }

    fn data_type(&self) -> DataType;

    fn size_of_elem(&self) -> usize {
        self.data_type().size()
    }

    /// number of bytes this array occupies in the appended section
    fn appended_size(&self, header: HeaderType) -> usize {
        header.size() + self.length() * self.size_of_elem()
    }
}

/// Marker types select how the arrays of a file are encoded
pub trait Encode {
    fn encoding() -> Encoding;

    /// whether the arrays are written to an `AppendedData` section
    fn is_binary() -> bool {
        matches!(Self::encoding(), Encoding::Appended)
    }
}

/// Anything that exports a [`Model`] to a file
pub trait ModelWriter {
    /// write one file for the model and return its path
    fn write(&self, model: &Model) -> Result<PathBuf, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii<N: Numeric>(values: &[N]) -> String {
        let mut out = String::new();
        values.iter().for_each(|v| v.push_ascii(&mut out));
        out
    }

    #[test]
    fn floats_keep_every_digit() {
        let values = [0.1, 1e16, -3.5e-12, 1.0 / 3.0, f64::MAX, f64::MIN_POSITIVE];
        let text = ascii(&values);

        // very large and very small magnitudes use an exponent, never a truncated mantissa
        assert!(text.starts_with("0.1 "));
        assert!(text.contains(" -3.5e-12 0.3333333333333333 "));

        let parsed: Vec<f64> = text
            .split_ascii_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(parsed, values);
    }

    #[test]
    fn integers_are_plain() {
        assert_eq!(ascii(&[-12i64, 0, 1_000_000]), "-12 0 1000000 ");
        assert_eq!(ascii(&[0u8, 1]), "0 1 ");
        assert_eq!(ascii(&[f32::NAN]), "NaN ");
    }
}
