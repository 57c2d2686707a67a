//! Common traits and types that are useful for working with `fem_vtk`
#![allow(unused_imports)]

pub use crate::model::{
    CellType, FieldPosition, FieldType, Model, ModelError, Tag, DEFAULT_MODEL_NAME,
    DEFAULT_PART_NAME, DEFAULT_STEP_NAME,
};
pub use crate::traits::{Array, Encode, ModelWriter, Numeric};
pub use crate::writer::{
    AsciiWriter, Base64Writer, BinaryWriter, CollectionWriter, HeaderType, Precision,
    WriterConfig,
};
pub use crate::{Ascii, Base64, Binary, Error};
