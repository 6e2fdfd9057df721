//! Named-dataset storage interface
//!
//! This module defines the abstract interface CSC decoding reads from. It is
//! a pure interface; the memory-mapped container and HDF5 implementations
//! live in the `spcount` crate.

use crate::Result;

/// Trait for containers holding named, typed, one-dimensional datasets
///
/// Dataset paths are slash-separated (`matrix/indices`). Reading a missing
/// dataset fails with [`crate::SpcountError::MissingDataset`].
pub trait DatasetSource {
    /// Whether a dataset exists at `path`
    fn contains(&self, path: &str) -> bool;

    /// Read an unsigned 32-bit dataset
    fn read_u32(&self, path: &str) -> Result<Vec<u32>>;

    /// Read an unsigned 64-bit dataset
    fn read_u64(&self, path: &str) -> Result<Vec<u64>>;

    /// Read a string dataset
    fn read_strings(&self, path: &str) -> Result<Vec<String>>;

    /// Read a string dataset if present
    fn read_optional_strings(&self, path: &str) -> Result<Option<Vec<String>>> {
        if self.contains(path) {
            self.read_strings(path).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    fn contains(&self, path: &str) -> bool {
        (**self).contains(path)
    }

    fn read_u32(&self, path: &str) -> Result<Vec<u32>> {
        (**self).read_u32(path)
    }

    fn read_u64(&self, path: &str) -> Result<Vec<u64>> {
        (**self).read_u64(path)
    }

    fn read_strings(&self, path: &str) -> Result<Vec<String>> {
        (**self).read_strings(path)
    }
}
