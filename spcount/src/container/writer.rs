//! Container writer
//!
//! Datasets are staged in memory, then written as header, JSON index and an
//! 8-byte aligned data section in one pass.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use spcount_core::format::constants::{csc, ALIGNMENT_BOUNDARY};
use spcount_core::format::container::encode_fixed_strings;
use spcount_core::validation::align_to_boundary;
use spcount_core::{
    ContainerHeader, DatasetDescriptor, DatasetDtype, DatasetIndex, Result, SparseMatrix,
    SpcountError, SvtMatrix,
};

use crate::reader::CscDatasetPaths;

/// Builds a container file from named datasets
#[derive(Debug, Default)]
pub struct ContainerWriter {
    datasets: Vec<(DatasetDescriptor, Vec<u8>)>,
}

impl ContainerWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, path: &str, dtype: DatasetDtype, len: usize, stride: u32, bytes: Vec<u8>) -> Result<()> {
        if self.datasets.iter().any(|(d, _)| d.path == path) {
            return Err(SpcountError::InvalidArgument(format!(
                "dataset {path:?} already staged"
            )));
        }
        self.datasets.push((
            DatasetDescriptor {
                path: path.to_string(),
                dtype,
                len: len as u64,
                offset: 0,
                stride,
            },
            bytes,
        ));
        Ok(())
    }

    /// Stage an unsigned 32-bit dataset
    pub fn add_u32(&mut self, path: &str, values: &[u32]) -> Result<()> {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(path, DatasetDtype::U32, values.len(), 0, bytes)
    }

    /// Stage an unsigned 64-bit dataset
    pub fn add_u64(&mut self, path: &str, values: &[u64]) -> Result<()> {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(path, DatasetDtype::U64, values.len(), 0, bytes)
    }

    /// Stage a string dataset; the stride is the longest label in bytes
    pub fn add_strings(&mut self, path: &str, labels: &[String]) -> Result<()> {
        let stride = labels.iter().map(String::len).max().unwrap_or(0).max(1);
        let bytes = encode_fixed_strings(path, labels, stride)?;
        let stride = u32::try_from(stride)
            .map_err(|_| SpcountError::dataset(path, "label too long"))?;
        self.push(path, DatasetDtype::Str, labels.len(), stride, bytes)
    }

    /// Stage the CSC datasets of `matrix` under `paths`
    ///
    /// Lacunar columns are written with explicit ones. Negative values
    /// cannot be stored and are rejected.
    pub fn add_svt(&mut self, matrix: &SvtMatrix<i32>, paths: &CscDatasetPaths) -> Result<()> {
        let nnz = matrix.nnz();
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        let mut indptr = Vec::with_capacity(matrix.ncol() + 1);
        indptr.push(0u32);
        for column in matrix.columns() {
            for (row, value) in column.iter() {
                let value = u32::try_from(value).map_err(|_| {
                    SpcountError::InvalidArgument(format!(
                        "value {value} cannot be stored as an unsigned count"
                    ))
                })?;
                indices.push(row);
                data.push(value);
            }
            let end = u32::try_from(indices.len()).map_err(|_| {
                SpcountError::InvalidArgument("too many nonzeros for u32 column pointers".into())
            })?;
            indptr.push(end);
        }

        self.add_u32(&paths.indices, &indices)?;
        self.add_u32(&paths.data, &data)?;
        self.add_u32(&paths.indptr, &indptr)?;
        self.add_u64(&paths.shape, &[matrix.nrow() as u64, matrix.ncol() as u64])?;
        if let (Some(path), Some(names)) = (&paths.row_names, &matrix.dimnames().rows) {
            self.add_strings(path, names)?;
        }
        if let (Some(path), Some(names)) = (&paths.col_names, &matrix.dimnames().cols) {
            self.add_strings(path, names)?;
        }
        Ok(())
    }

    /// Writer holding `matrix` in the default `matrix` group layout
    pub fn from_svt(matrix: &SvtMatrix<i32>) -> Result<Self> {
        let mut writer = Self::new();
        writer.add_svt(matrix, &CscDatasetPaths::for_group(csc::DEFAULT_GROUP, true))?;
        Ok(writer)
    }

    /// Serialize the staged datasets into container bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut index = DatasetIndex::default();
        let mut offset = 0usize;
        for (descriptor, bytes) in &self.datasets {
            let mut descriptor = descriptor.clone();
            descriptor.offset = offset as u64;
            offset = align_to_boundary(offset + bytes.len(), ALIGNMENT_BOUNDARY);
            index.datasets.push(descriptor);
        }
        let index_bytes = serde_json::to_vec(&index)
            .map_err(|e| SpcountError::dataset("<index>", e.to_string()))?;

        let header = ContainerHeader::new(index_bytes.len() as u64);
        let data_offset = header.data_offset()?;
        let mut out = Vec::with_capacity(data_offset + offset);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&index_bytes);
        out.resize(data_offset, 0);
        for (descriptor, (_, bytes)) in index.datasets.iter().zip(&self.datasets) {
            out.resize(data_offset + descriptor.offset as usize, 0);
            out.extend_from_slice(bytes);
        }
        Ok(out)
    }

    /// Write the container to `path`
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let context = || format!("failed to write {}", path.display());
        let file = File::create(path).map_err(|e| SpcountError::io(context(), e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .map_err(|e| SpcountError::io(context(), e))?;
        writer.flush().map_err(|e| SpcountError::io(context(), e))?;
        tracing::debug!(
            path = %path.display(),
            datasets = self.datasets.len(),
            bytes = bytes.len(),
            "wrote container"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spcount_core::{Dimnames, ErrorCategory, SvtColumn};

    #[test]
    fn test_layout_aligned() {
        let mut writer = ContainerWriter::new();
        writer.add_u32("a", &[1, 2, 3]).unwrap();
        writer.add_u64("b", &[9]).unwrap();
        let bytes = writer.to_bytes().unwrap();

        let header = ContainerHeader::from_bytes(&bytes).unwrap();
        let data_offset = header.data_offset().unwrap();
        assert_eq!(data_offset % ALIGNMENT_BOUNDARY, 0);
        // "a" is 12 bytes, so "b" starts at the next 8-byte boundary
        assert_eq!(bytes.len(), data_offset + 16 + 8);
        assert_eq!(&bytes[data_offset + 16..], &9u64.to_le_bytes());
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let mut writer = ContainerWriter::new();
        writer.add_u32("a", &[1]).unwrap();
        let err = writer.add_u64("a", &[1]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Usage);
    }

    #[test]
    fn test_negative_values_rejected() {
        let matrix = SvtMatrix::from_columns(
            1,
            vec![SvtColumn::Explicit {
                rows: vec![0].into(),
                values: vec![-2],
            }],
            Dimnames::default(),
        )
        .unwrap();
        let err = ContainerWriter::from_svt(&matrix).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Usage);
    }
}
