//! Memory-mapped container files
//!
//! The header and JSON dataset index are parsed eagerly; dataset payloads
//! are read from the mapping on demand.

use std::fs::File;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use memmap2::Mmap;
use spcount_core::format::container::decode_fixed_strings;
use spcount_core::{
    ContainerHeader, DatasetDescriptor, DatasetDtype, DatasetIndex, DatasetSource, Result,
    SpcountError,
};

/// A read-only container opened through a memory map
pub struct ContainerFile {
    path: PathBuf,
    _file: File,
    mmap: Mmap,
    header: ContainerHeader,
    data_offset: usize,
    datasets: HashMap<String, DatasetDescriptor>,
}

impl ContainerFile {
    /// Open a container and parse its header and dataset index
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|e| SpcountError::io(format!("failed to open {}", path.display()), e))?;
        // SAFETY: the file stays open for the lifetime of the mapping and
        // containers are treated as immutable once written.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| SpcountError::io(format!("failed to map {}", path.display()), e))?;

        let header = ContainerHeader::from_bytes(&mmap)?;
        let index_end = usize::try_from(header.index_len)
            .ok()
            .and_then(|len| ContainerHeader::SIZE.checked_add(len))
            .filter(|&end| end <= mmap.len())
            .ok_or_else(|| SpcountError::dataset("<index>", "dataset index runs past end of file"))?;
        let index: DatasetIndex = serde_json::from_slice(&mmap[ContainerHeader::SIZE..index_end])
            .map_err(|e| SpcountError::dataset("<index>", e.to_string()))?;

        let data_offset = header.data_offset()?.min(mmap.len());
        let mut datasets = HashMap::with_capacity(index.datasets.len());
        for descriptor in index.datasets {
            if datasets.contains_key(&descriptor.path) {
                return Err(SpcountError::dataset(&descriptor.path, "duplicate dataset path"));
            }
            datasets.insert(descriptor.path.clone(), descriptor);
        }

        tracing::debug!(
            path = %path.display(),
            datasets = datasets.len(),
            bytes = mmap.len(),
            "opened container"
        );

        Ok(Self {
            path,
            _file: file,
            mmap,
            header,
            data_offset,
            datasets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Descriptor of the dataset at `path`
    pub fn descriptor(&self, path: &str) -> Option<&DatasetDescriptor> {
        self.datasets.get(path)
    }

    /// Paths of all datasets, sorted
    pub fn dataset_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.datasets.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    fn payload(&self, path: &str, dtype: DatasetDtype) -> Result<(&DatasetDescriptor, &[u8])> {
        let descriptor = self
            .datasets
            .get(path)
            .ok_or_else(|| SpcountError::MissingDataset(path.to_string()))?;
        if descriptor.dtype != dtype {
            return Err(SpcountError::dataset(
                path,
                format!("expected {dtype} elements but found {}", descriptor.dtype),
            ));
        }
        let section = &self.mmap[self.data_offset..];
        let range = descriptor.byte_range(section.len())?;
        Ok((descriptor, &section[range]))
    }
}

/// Reinterpret little-endian bytes, copying through an aligned cast when possible
fn read_le<T, const N: usize>(bytes: &[u8], from_le: fn([u8; N]) -> T) -> Vec<T>
where
    T: bytemuck::Pod,
{
    if cfg!(target_endian = "little") {
        if let Ok(values) = bytemuck::try_cast_slice::<u8, T>(bytes) {
            return values.to_vec();
        }
    }
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            from_le(raw)
        })
        .collect()
}

impl DatasetSource for ContainerFile {
    fn contains(&self, path: &str) -> bool {
        self.datasets.contains_key(path)
    }

    fn read_u32(&self, path: &str) -> Result<Vec<u32>> {
        let (_, bytes) = self.payload(path, DatasetDtype::U32)?;
        Ok(read_le(bytes, u32::from_le_bytes))
    }

    fn read_u64(&self, path: &str) -> Result<Vec<u64>> {
        let (_, bytes) = self.payload(path, DatasetDtype::U64)?;
        Ok(read_le(bytes, u64::from_le_bytes))
    }

    fn read_strings(&self, path: &str) -> Result<Vec<String>> {
        let (descriptor, bytes) = self.payload(path, DatasetDtype::Str)?;
        decode_fixed_strings(path, bytes, descriptor.stride as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerWriter;
    use spcount_core::ErrorCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn written(writer: &ContainerWriter) -> NamedTempFile {
        let file = NamedTempFile::with_suffix(".csc").unwrap();
        writer.write(file.path()).unwrap();
        file
    }

    #[test]
    fn test_read_datasets() {
        let mut writer = ContainerWriter::new();
        writer.add_u32("m/indices", &[0, 7, 3]).unwrap();
        writer.add_u64("m/shape", &[8, 2]).unwrap();
        writer
            .add_strings("m/barcodes", &["AAAC".to_string(), "TT".to_string()])
            .unwrap();
        let file = written(&writer);

        let container = ContainerFile::open(file.path()).unwrap();
        assert_eq!(container.read_u32("m/indices").unwrap(), vec![0, 7, 3]);
        assert_eq!(container.read_u64("m/shape").unwrap(), vec![8, 2]);
        assert_eq!(
            container.read_strings("m/barcodes").unwrap(),
            vec!["AAAC".to_string(), "TT".to_string()]
        );
        assert_eq!(
            container.dataset_paths(),
            vec!["m/barcodes", "m/indices", "m/shape"]
        );
        assert!(container.contains("m/shape"));
        assert!(!container.contains("m/data"));
    }

    #[test]
    fn test_missing_and_mistyped() {
        let mut writer = ContainerWriter::new();
        writer.add_u64("m/shape", &[1, 1]).unwrap();
        let file = written(&writer);
        let container = ContainerFile::open(file.path()).unwrap();

        let err = container.read_u32("m/data").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);

        let err = container.read_u32("m/shape").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_rejects_garbage() {
        let mut file = NamedTempFile::with_suffix(".csc").unwrap();
        file.write_all(b"definitely not a container").unwrap();
        file.flush().unwrap();
        let err = ContainerFile::open(file.path()).err().unwrap();
        assert_eq!(err.category(), ErrorCategory::Format);

        let mut file = NamedTempFile::with_suffix(".csc").unwrap();
        file.write_all(&ContainerHeader::new(1024).to_bytes()).unwrap();
        file.flush().unwrap();
        let err = ContainerFile::open(file.path()).err().unwrap();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_open_missing_file() {
        let err = ContainerFile::open("/nonexistent/matrix.csc").err().unwrap();
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}
