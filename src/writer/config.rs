use crate::Error;

use std::path::{Path, PathBuf};

/// precision of the floating point payloads (coordinates and fields)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Float32,
    #[default]
    Float64,
}

/// integer type of the byte count written in front of every binary block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderType {
    UInt32,
    #[default]
    UInt64,
}

impl HeaderType {
    /// value of the `header_type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderType::UInt32 => "UInt32",
            HeaderType::UInt64 => "UInt64",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "UInt32" => Some(HeaderType::UInt32),
            "UInt64" => Some(HeaderType::UInt64),
            _ => None,
        }
    }

    /// number of bytes of the header
    pub fn size(&self) -> usize {
        match self {
            HeaderType::UInt32 => 4,
            HeaderType::UInt64 => 8,
        }
    }

    /// little endian bytes of a block header announcing `num_bytes` bytes
    pub(crate) fn encode(&self, num_bytes: usize) -> Result<Vec<u8>, Error> {
        let bytes = match self {
            HeaderType::UInt32 => u32::try_from(num_bytes)
                .map_err(|_| Error::HeaderOverflow {
                    bytes: num_bytes,
                    header: self.as_str(),
                })?
                .to_le_bytes()
                .to_vec(),
            HeaderType::UInt64 => (num_bytes as u64).to_le_bytes().to_vec(),
        };

        Ok(bytes)
    }
}

/// Configuration shared by every file a writer produces
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    pub output_dir: PathBuf,
    pub precision: Precision,
    pub header_type: HeaderType,
    /// file extension, without the leading dot
    pub extension: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("vtk_files"),
            precision: Precision::default(),
            header_type: HeaderType::default(),
            extension: "vtu".into(),
        }
    }
}

impl WriterConfig {
    #[must_use]
    pub fn with_output_dir<P: AsRef<Path>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_header_type(mut self, header_type: HeaderType) -> Self {
        self.header_type = header_type;
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').into();
        self
    }
}
