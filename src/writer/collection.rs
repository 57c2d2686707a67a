use super::{temporary_path, write_file, VtuWriter};
use crate::model::{check_name, Model};
use crate::traits::Encode;
use crate::write_vtk::{close_element, empty_element, open_element};
use crate::Error;

use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// model name and part name
type PartKey = (String, String);

#[derive(Debug, Clone, PartialEq)]
struct DataSet {
    timestep: f64,
    part: usize,
    /// path relative to the collection file, always `/` separated
    file: String,
}

/// Writes a time series of models and a `.pvd` collection file referencing all of them.
///
/// Every call to [`CollectionWriter::write`] produces
/// `<output_dir>/<model_name>/<part_name>_<frame>.<extension>`, where `frame` counts the
/// files written for that part, starting at 0. [`CollectionWriter::finish`] then writes
/// `<output_dir>/<collection_name>.pvd`, which lists every file with the frame time of its
/// model. Parts are identified by model and part name together, and numbered in the order
/// they were first written.
#[derive(Debug)]
pub struct CollectionWriter<E> {
    writer: VtuWriter<E>,
    name: String,
    parts: Vec<PartKey>,
    frames: HashMap<PartKey, usize>,
    datasets: Vec<DataSet>,
}

impl<E: Encode> CollectionWriter<E> {
    pub fn new(writer: VtuWriter<E>, collection_name: &str) -> Result<Self, Error> {
        check_name("collection_name", collection_name)?;

        Ok(Self {
            writer,
            name: collection_name.into(),
            parts: Vec::new(),
            frames: HashMap::new(),
            datasets: Vec::new(),
        })
    }

    /// the path the collection file is written to by [`CollectionWriter::finish`]
    pub fn collection_path(&self) -> PathBuf {
        self.writer.config().output_dir.join(format!("{}.pvd", self.name))
    }

    /// number of files written so far
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// write the next frame of `model` and return the path of the new file
    pub fn write(&mut self, model: &Model) -> Result<PathBuf, Error> {
        let part_name = model.part_name();
        let key: PartKey = (model.model_name().into(), part_name.into());
        let frame = self.frames.get(&key).copied().unwrap_or(0);

        let file_stem = format!("{part_name}_{frame}");
        let path = self.writer.file_path(model, &file_stem);

        self.writer.write_to_path(model, &path)?;

        let part = match self.parts.iter().position(|p| *p == key) {
            Some(part) => part,
            None => {
                self.parts.push(key.clone());
                self.parts.len() - 1
            }
        };

        self.frames.insert(key, frame + 1);
        self.datasets.push(DataSet {
            timestep: model.frame_time(),
            part,
            file: format!(
                "{}/{file_stem}.{}",
                model.model_name(),
                self.writer.config().extension
            ),
        });

        debug!(
            model = model.model_name(),
            part = part_name,
            frame,
            "added file to collection"
        );

        Ok(path)
    }

    /// write the collection file and return its path
    pub fn finish(self) -> Result<PathBuf, Error> {
        let path = self.collection_path();

        fs::create_dir_all(&self.writer.config().output_dir)?;

        let tmp_path = temporary_path(&path);
        let result = write_file(&tmp_path, |file| {
            let mut writer = Writer::new_with_indent(file, b' ', 2);
            write_pvd(&mut writer, &self.datasets)
        })
        .and_then(|_| fs::rename(&tmp_path, &path).map_err(Error::from));

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        info!(
            path = %path.display(),
            files = self.datasets.len(),
            parts = self.parts.len(),
            "wrote collection"
        );

        Ok(path)
    }
}

fn write_pvd<W: std::io::Write>(writer: &mut Writer<W>, datasets: &[DataSet]) -> Result<(), Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    open_element(
        writer,
        "VTKFile",
        &[
            ("type", "Collection"),
            ("version", "0.1"),
            ("byte_order", "LittleEndian"),
        ],
    )?;
    open_element(writer, "Collection", &[])?;

    for dataset in datasets {
        let mut buffer = ryu::Buffer::new();
        let timestep = buffer.format(dataset.timestep);
        let part = dataset.part.to_string();

        empty_element(
            writer,
            "DataSet",
            &[
                ("timestep", timestep),
                ("group", ""),
                ("part", part.as_str()),
                ("file", dataset.file.as_str()),
            ],
        )?;
    }

    close_element(writer, "Collection")?;
    close_element(writer, "VTKFile")?;

    Ok(())
}
