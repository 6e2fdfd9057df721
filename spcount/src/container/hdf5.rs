//! HDF5 dataset source
//!
//! Requires the system HDF5 library. Label datasets may be stored as
//! variable-length or fixed-length strings.

use std::path::Path;

use hdf5::types::{FixedAscii, VarLenAscii, VarLenUnicode};
use spcount_core::{DatasetSource, Result, SpcountError};

/// Longest fixed-length label read from an HDF5 string dataset
const MAX_FIXED_LABEL: usize = 256;

fn h5err(path: &str, e: hdf5::Error) -> SpcountError {
    SpcountError::io(
        format!("HDF5 dataset {path:?}"),
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    )
}

/// An HDF5 file opened read-only
pub struct Hdf5Source {
    file: hdf5::File,
}

impl Hdf5Source {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = hdf5::File::open(path).map_err(|e| {
            SpcountError::io(
                format!("failed to open {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            )
        })?;
        Ok(Self { file })
    }

    fn dataset(&self, path: &str) -> Result<hdf5::Dataset> {
        if !self.contains(path) {
            return Err(SpcountError::MissingDataset(path.to_string()));
        }
        self.file.dataset(path).map_err(|e| h5err(path, e))
    }
}

impl DatasetSource for Hdf5Source {
    fn contains(&self, path: &str) -> bool {
        // link_exists only resolves one level, so walk the groups
        let mut prefix = String::new();
        for part in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            if !self.file.link_exists(&prefix) {
                return false;
            }
        }
        true
    }

    fn read_u32(&self, path: &str) -> Result<Vec<u32>> {
        self.dataset(path)?
            .read_raw::<u32>()
            .map_err(|e| h5err(path, e))
    }

    fn read_u64(&self, path: &str) -> Result<Vec<u64>> {
        self.dataset(path)?
            .read_raw::<u64>()
            .map_err(|e| h5err(path, e))
    }

    fn read_strings(&self, path: &str) -> Result<Vec<String>> {
        let dataset = self.dataset(path)?;
        if let Ok(labels) = dataset.read_raw::<VarLenUnicode>() {
            return Ok(labels.iter().map(|s| s.as_str().to_string()).collect());
        }
        if let Ok(labels) = dataset.read_raw::<VarLenAscii>() {
            return Ok(labels.iter().map(|s| s.as_str().to_string()).collect());
        }
        dataset
            .read_raw::<FixedAscii<MAX_FIXED_LABEL>>()
            .map(|labels| labels.iter().map(|s| s.as_str().to_string()).collect())
            .map_err(|e| h5err(path, e))
    }
}
