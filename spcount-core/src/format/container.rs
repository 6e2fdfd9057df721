//! CSC container header and dataset index definitions
//!
//! A container file is laid out as
//!
//! ```text
//! [0..4]    magic "SPCC"
//! [4]       version
//! [5..8]    padding
//! [8..16]   index length in bytes (u64, little-endian)
//! [16..]    JSON dataset index
//! [aligned] data section, 8-byte aligned
//! ```
//!
//! Dataset offsets are relative to the start of the data section. Numeric
//! datasets are little-endian; string datasets use a fixed stride with zero
//! padding, the way HDF5 stores `S<n>` strings.

use crate::format::constants::{ALIGNMENT_BOUNDARY, MAX_LABEL_STRIDE};
use crate::validation::align_to_boundary;
use crate::{Result, SpcountError};

/// Fixed-size container header
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Magic bytes: "SPCC"
    pub magic: [u8; 4],
    /// Format version
    pub version: u8,
    /// Padding for alignment
    pub _padding: [u8; 3],
    /// Length of the JSON dataset index in bytes
    pub index_len: u64,
}

impl ContainerHeader {
    /// Magic bytes for container files
    pub const MAGIC: [u8; 4] = *b"SPCC";

    /// Current container version
    pub const VERSION: u8 = 1;

    /// Size of the header in bytes
    pub const SIZE: usize = 16;

    /// Create a header for an index of the given length
    pub const fn new(index_len: u64) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            _padding: [0; 3],
            index_len,
        }
    }

    /// Offset of the data section from the start of the file
    pub fn data_offset(&self) -> Result<usize> {
        let index_len = usize::try_from(self.index_len)
            .map_err(|_| SpcountError::dataset("<header>", "index length overflows usize"))?;
        let end = Self::SIZE
            .checked_add(index_len)
            .ok_or_else(|| SpcountError::dataset("<header>", "index length overflows usize"))?;
        Ok(align_to_boundary(end, ALIGNMENT_BOUNDARY))
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(SpcountError::dataset(
                "<header>",
                format!("container is {} bytes, shorter than its header", bytes.len()),
            ));
        }

        if bytes[0..4] != Self::MAGIC {
            return Err(SpcountError::dataset("<header>", "invalid magic bytes"));
        }

        let version = bytes[4];
        if version > Self::VERSION {
            return Err(SpcountError::dataset(
                "<header>",
                format!("unsupported container version {version}"),
            ));
        }

        let mut index_len = [0u8; 8];
        index_len.copy_from_slice(&bytes[8..16]);

        Ok(Self {
            magic: Self::MAGIC,
            version,
            _padding: [0; 3],
            index_len: u64::from_le_bytes(index_len),
        })
    }

    /// Convert header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[8..16].copy_from_slice(&self.index_len.to_le_bytes());
        bytes
    }
}

impl Default for ContainerHeader {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Element types a container dataset may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DatasetDtype {
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// Fixed-stride, zero-padded UTF-8 string
    Str,
}

impl DatasetDtype {
    /// Bytes per element; strings use the descriptor's stride instead
    pub const fn size_bytes(self) -> Option<usize> {
        match self {
            DatasetDtype::U32 => Some(4),
            DatasetDtype::U64 => Some(8),
            DatasetDtype::Str => None,
        }
    }
}

impl core::fmt::Display for DatasetDtype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DatasetDtype::U32 => write!(f, "u32"),
            DatasetDtype::U64 => write!(f, "u64"),
            DatasetDtype::Str => write!(f, "str"),
        }
    }
}

/// Location and type of one named dataset
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetDescriptor {
    /// Slash-separated dataset path, e.g. `matrix/indices`
    pub path: String,
    /// Element type
    pub dtype: DatasetDtype,
    /// Number of elements
    pub len: u64,
    /// Byte offset from the start of the data section
    pub offset: u64,
    /// Bytes per string element (string datasets only)
    #[cfg_attr(feature = "serde", serde(default))]
    pub stride: u32,
}

impl DatasetDescriptor {
    /// Size of the dataset payload in bytes
    pub fn byte_len(&self) -> Result<usize> {
        let element = match self.dtype.size_bytes() {
            Some(size) => size,
            None => {
                if self.stride == 0 || self.stride > MAX_LABEL_STRIDE {
                    return Err(SpcountError::dataset(
                        &self.path,
                        format!("invalid string stride {}", self.stride),
                    ));
                }
                self.stride as usize
            }
        };
        usize::try_from(self.len)
            .ok()
            .and_then(|len| len.checked_mul(element))
            .ok_or_else(|| SpcountError::dataset(&self.path, "dataset size overflows usize"))
    }

    /// Byte range of the payload within a data section of `section_len` bytes
    pub fn byte_range(&self, section_len: usize) -> Result<core::ops::Range<usize>> {
        let start = usize::try_from(self.offset)
            .map_err(|_| SpcountError::dataset(&self.path, "offset overflows usize"))?;
        let end = start
            .checked_add(self.byte_len()?)
            .ok_or_else(|| SpcountError::dataset(&self.path, "dataset end overflows usize"))?;
        if end > section_len {
            return Err(SpcountError::dataset(
                &self.path,
                format!("dataset ends at byte {end} but the data section holds {section_len}"),
            ));
        }
        Ok(start..end)
    }
}

/// The JSON document following the header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetIndex {
    pub datasets: Vec<DatasetDescriptor>,
}

/// Decode `count` fixed-stride, zero-padded strings
pub fn decode_fixed_strings(path: &str, bytes: &[u8], stride: usize) -> Result<Vec<String>> {
    if stride == 0 || bytes.len() % stride != 0 {
        return Err(SpcountError::dataset(
            path,
            "string payload is not a multiple of its stride",
        ));
    }
    bytes
        .chunks_exact(stride)
        .map(|chunk| {
            let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
            core::str::from_utf8(&chunk[..end])
                .map(str::to_string)
                .map_err(|_| SpcountError::dataset(path, "label is not valid UTF-8"))
        })
        .collect()
}

/// Encode strings with a fixed stride, zero padding each entry
pub fn encode_fixed_strings(path: &str, labels: &[String], stride: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(labels.len() * stride);
    for label in labels {
        if label.len() > stride {
            return Err(SpcountError::dataset(path, "label exceeds stride"));
        }
        bytes.extend_from_slice(label.as_bytes());
        bytes.resize(bytes.len() + stride - label.len(), 0);
    }
    Ok(bytes)
}
