use crate::array::DataType;
use crate::traits::{Array, Numeric};
use crate::write_vtk::{self, Encoding};
use crate::writer::HeaderType;
use crate::Error;

use quick_xml::events::{BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// A named, flat array of values making up `length / components` tuples
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayData<NUM> {
    name: String,
    values: Vec<NUM>,
    components: usize,
}

impl<NUM: Numeric> ArrayData<NUM> {
    pub fn new<T: Into<String>>(name: T, values: Vec<NUM>, components: usize) -> Self {
        Self {
            name: name.into(),
            values,
            components,
        }
    }

    pub fn values(&self) -> &[NUM] {
        &self.values
    }

    fn byte_data(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.values.len() * NUM::SIZE);
        self.values
            .iter()
            .for_each(|value| value.extend_le_bytes(&mut bytes));
        bytes
    }
}

impl<NUM> Array for ArrayData<NUM>
where
    NUM: Numeric,
{
    fn write_ascii<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        write_vtk::write_inline_array_header(writer, self, Encoding::Ascii)?;

        let mut data = String::with_capacity(self.values.len() * 8);
        self.values.iter().for_each(|x| x.push_ascii(&mut data));

        let data = Event::Text(BytesText::new(data.trim_end()));
        writer.write_event(data)?;

        write_vtk::close_inline_array_header(writer)?;

        Ok(())
    }

    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        header: HeaderType,
    ) -> Result<(), Error> {
        write_vtk::write_inline_array_header(writer, self, Encoding::Base64)?;

        let values = self.byte_data();

        // the byte count and the values are encoded as a single base64 stream
        let mut byte_data = header.encode(values.len())?;
        byte_data.extend_from_slice(&values);

        let data = base64::encode(byte_data.as_slice());

        let characters = Event::Text(BytesText::new(&data));
        writer.write_event(characters)?;

        write_vtk::close_inline_array_header(writer)?;

        Ok(())
    }

    fn write_appended_header<W: Write>(
        &self,
        writer: &mut Writer<W>,
        offset: u64,
    ) -> Result<(), Error> {
        write_vtk::write_appended_dataarray_header(writer, self, offset)
    }

    fn write_binary<W: Write>(
        &self,
        writer: &mut Writer<W>,
        header: HeaderType,
    ) -> Result<(), Error> {
        let values = self.byte_data();
        let size = header.encode(values.len())?;

        let writer = writer.inner();
        writer.write_all(&size)?;
        writer.write_all(&values)?;

        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn length(&self) -> usize {
        self.values.len()
    }

    fn components(&self) -> usize {
        self.components
    }

    fn data_type(&self) -> DataType {
        NUM::as_data_type()
    }

    fn size_of_elem(&self) -> usize {
        NUM::SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written<F>(write: F) -> String
    where
        F: FnOnce(&mut Writer<Vec<u8>>) -> Result<(), Error>,
    {
        let mut writer = Writer::new(Vec::new());
        write(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn ascii_floats() {
        let array = ArrayData::new("u", vec![0.1, 2.0, -3.5e-12], 3);
        let xml = written(|w| array.write_ascii(w));

        assert_eq!(
            xml,
            r#"<DataArray type="Float64" Name="u" NumberOfComponents="3" format="ascii">0.1 2.0 -3.5e-12</DataArray>"#
        );
    }

    #[test]
    fn ascii_integers() {
        let array = ArrayData::new("offsets", vec![4i64, 8, 11], 1);
        let xml = written(|w| array.write_ascii(w));
        assert!(xml.contains(r#"type="Int64""#));
        assert!(xml.contains(">4 8 11<"));
    }

    #[test]
    fn base64_header_then_values() {
        let array = ArrayData::new("g", vec![1u8, 0, 1], 1);
        let xml = written(|w| array.write_base64(w, HeaderType::UInt64));

        let mut expected = 3u64.to_le_bytes().to_vec();
        expected.extend_from_slice(&[1, 0, 1]);

        assert!(xml.contains(r#"format="binary""#));
        assert!(xml.contains(&base64::encode(&expected)));
    }

    #[test]
    fn binary_block() {
        let array = ArrayData::new("x", vec![1.5f32], 1);
        let mut writer = Writer::new(Vec::new());
        array.write_binary(&mut writer, HeaderType::UInt32).unwrap();

        let bytes = writer.into_inner();
        assert_eq!(&bytes[..4], &4u32.to_le_bytes());
        assert_eq!(&bytes[4..], &1.5f32.to_le_bytes());
        assert_eq!(array.appended_size(HeaderType::UInt32), bytes.len());
    }

    #[test]
    fn appended_header_is_empty_element() {
        let array = ArrayData::new("x", vec![1.0f64, 2.0], 1);
        let xml = written(|w| array.write_appended_header(w, 24));
        assert_eq!(
            xml,
            r#"<DataArray type="Float64" Name="x" NumberOfComponents="1" format="appended" offset="24"/>"#
        );
    }
}
