//! # Writers
//!
//! A [`VtuWriter`] exports a [`Model`] as a single-piece unstructured grid (`.vtu`) file.
//! The encoding of the data arrays is chosen with a marker type:
//!
//! * [`Ascii`](crate::Ascii): every array as whitespace separated text ([`AsciiWriter`])
//! * [`Base64`](crate::Base64): inline base64 encoded bytes ([`Base64Writer`])
//! * [`Binary`](crate::Binary): raw bytes in an appended section at the end of the file
//!   ([`BinaryWriter`])
//!
//! Every writer produces `<output_dir>/<model_name>/<part_name>.<extension>` and writes the
//! same bytes for the same model and configuration. Files are first written to a temporary
//! sibling and moved into place once complete, so a failed write never leaves a truncated
//! file behind.

mod collection;
mod config;
mod piece;

pub use collection::CollectionWriter;
pub use config::{HeaderType, Precision, WriterConfig};
pub(crate) use piece::Piece;
pub use piece::{ELEMENT_TAGS, NODE_TAGS};

use crate::model::Model;
use crate::traits::{Encode, ModelWriter};
use crate::write_vtk;
use crate::{Ascii, Base64, Binary, Error};

use quick_xml::Writer;
use std::fs;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::info;

/// writes every array as ascii text
pub type AsciiWriter = VtuWriter<Ascii>;
/// writes every array inline as base64 encoded bytes
pub type Base64Writer = VtuWriter<Base64>;
/// writes every array as raw bytes to an appended section
pub type BinaryWriter = VtuWriter<Binary>;

/// Unstructured grid writer, generic over the encoding of its data arrays
#[derive(Debug, Clone)]
pub struct VtuWriter<E> {
    config: WriterConfig,
    encoding: PhantomData<E>,
}

impl<E> Default for VtuWriter<E> {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

impl<E> VtuWriter<E> {
    pub fn new(config: WriterConfig) -> Self {
        Self {
            config,
            encoding: PhantomData,
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// `<output_dir>/<model_name>/<part_name>.<extension>`
    pub fn path_for(&self, model: &Model) -> PathBuf {
        self.file_path(model, model.part_name())
    }

    /// `<output_dir>/<model_name>/<file_stem>.<extension>`
    pub(crate) fn file_path(&self, model: &Model, file_stem: &str) -> PathBuf {
        self.config
            .output_dir
            .join(model.model_name())
            .join(format!("{file_stem}.{}", self.config.extension))
    }
}

impl<E: Encode> VtuWriter<E> {
    /// Write the file for `model` to any sink.
    ///
    /// The model is validated and translated to local indices before the first byte is
    /// written.
    pub fn write_to<W: Write>(&self, model: &Model, sink: W) -> Result<(), Error> {
        let piece = Piece::build(model, self.config.precision)?;

        let mut writer = Writer::new_with_indent(sink, b' ', 2);
        write_vtk::write_vtk::<_, E>(&mut writer, &piece, self.config.header_type)?;
        writer.inner().flush()?;

        Ok(())
    }

    /// Write the file for `model` to `path`, creating missing parent directories. An
    /// existing file at `path` is only replaced once the new file is complete.
    pub fn write_to_path(&self, model: &Model, path: &Path) -> Result<(), Error> {
        // validation errors surface before anything is created on disk
        let piece = Piece::build(model, self.config.precision)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = temporary_path(path);

        let result = write_file(&tmp_path, |file| {
            let mut writer = Writer::new_with_indent(file, b' ', 2);
            write_vtk::write_vtk::<_, E>(&mut writer, &piece, self.config.header_type)
        })
        .and_then(|_| fs::rename(&tmp_path, path).map_err(Error::from));

        if let Err(e) = result {
            // the temporary file may not exist if creating it was what failed
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        info!(
            path = %path.display(),
            points = piece.number_of_points(),
            cells = piece.number_of_cells(),
            encoding = E::encoding().to_str(),
            "wrote unstructured grid"
        );

        Ok(())
    }
}

impl<E: Encode> ModelWriter for VtuWriter<E> {
    fn write(&self, model: &Model) -> Result<PathBuf, Error> {
        let path = self.path_for(model);
        self.write_to_path(model, &path)?;
        Ok(path)
    }
}

/// sibling of `path` that a file is written to before it is moved into place
pub(crate) fn temporary_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    if let Some(file_name) = path.file_name() {
        name.push(file_name);
    }
    name.push(".tmp");
    path.with_file_name(name)
}

/// create `path`, hand a buffered writer for it to `write`, then flush and sync it
pub(crate) fn write_file<F>(path: &Path, write: F) -> Result<(), Error>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<(), Error>,
{
    let file = fs::File::create(path)?;
    let mut buffered = BufWriter::new(file);

    write(&mut buffered)?;

    let file = buffered.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::plate;

    #[test]
    fn output_path() {
        let writer = AsciiWriter::new(WriterConfig::default().with_output_dir("out"));
        assert_eq!(
            writer.path_for(&plate()),
            Path::new("out/example_model/example_part.vtu")
        );
    }

    #[test]
    fn temporary_sibling() {
        assert_eq!(
            temporary_path(Path::new("a/b/part.vtu")),
            Path::new("a/b/.part.vtu.tmp")
        );
    }

    #[test]
    fn ascii_document() {
        let mut bytes = Vec::new();
        AsciiWriter::default().write_to(&plate(), &mut bytes).unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0"?>"#));
        assert!(xml.contains(r#"<VTKFile type="UnstructuredGrid" version="1.0" byte_order="LittleEndian" header_type="UInt64">"#));
        assert!(xml.contains(r#"<Piece NumberOfPoints="8" NumberOfCells="5">"#));
        assert!(xml.contains(">0 1 4 3 1 2 5 4 3 4 6 4 5 7 4 7 6<"));
        assert!(xml.contains(">4 8 11 14 17<"));
        assert!(xml.contains(">9 9 5 5 5<"));
        assert!(!xml.contains("AppendedData"));
    }

    #[test]
    fn appended_document() {
        let mut bytes = Vec::new();
        BinaryWriter::default().write_to(&plate(), &mut bytes).unwrap();

        let marker = b"<AppendedData encoding=\"raw\">_";
        let start = bytes
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();

        // the first block holds the 8 points, 3 components each
        assert_eq!(&bytes[start..start + 8], &(8u64 * 3 * 8).to_le_bytes());

        let head = String::from_utf8_lossy(&bytes[..start]);
        assert!(head.contains(r#"Name="Points" NumberOfComponents="3" format="appended" offset="0"/>"#));
        // 8 header bytes + 192 point bytes
        assert!(head.contains(r#"Name="connectivity" NumberOfComponents="1" format="appended" offset="200"/>"#));
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = std::env::temp_dir().join("fem_vtk_writer_failed_write");
        let _ = fs::remove_dir_all(&dir);

        let empty = Model::new(vec![], vec![], vec![], vec![], vec![], "m", "p").unwrap();
        let writer = AsciiWriter::new(WriterConfig::default().with_output_dir(&dir));

        assert!(writer.write(&empty).is_err());
        assert!(!writer.path_for(&empty).exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
