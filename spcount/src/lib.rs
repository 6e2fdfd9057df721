//! spcount - Sparse Count Matrix Ingestion
//!
//! This library reads sparse count matrices from dense CSV tables,
//! Matrix-Market coordinate files, 10x-style directory bundles and
//! compressed-sparse-column containers, and builds them into the COO or SVT
//! representations defined in `spcount-core`.
//!
//! ## Architecture
//!
//! spcount follows a definition/implementation separation:
//!
//! - **spcount-core**: data model, builders, normalization, transforms and
//!   validation (no I/O)
//! - **spcount**: format readers, container storage, read options and the
//!   host object boundary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spcount::{read_sparse_matrix, ReadOptions, Representation};
//!
//! fn example() -> spcount::Result<()> {
//!     let options = ReadOptions::default().with_representation(Representation::Svt);
//!     let matrix = read_sparse_matrix("filtered_feature_bc_matrix", &options)?;
//!     println!("{} x {} with {} nonzeros", matrix.nrow(), matrix.ncol(), matrix.nnz());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): memory-mapped `.csc` containers
//! - **hdf5**: `.h5` containers through the system HDF5 library
//! - **cli** (default): dependencies of the command-line examples

use std::path::Path;

// Re-export core abstractions and definitions
pub use spcount_core::{
    // Builders and representations
    CooBuilder, CooMatrix, DynamicBuilder, DynamicMatrix, MatrixBuilder, Representation,
    SvtBuilder, SvtColumn, SvtMatrix,
    // Traits
    DatasetSource, FormatReader, MatrixElement, MatrixOperations, SparseMatrix,
    // Data model
    Dimnames, MatrixMetadata, NonZeroEntry,
    // Transforms
    poisson_deviance, poisson_dispersion, svt_apply, Transform,
    // Error handling
    ErrorCategory, Result, SpcountError,
};

pub mod config;
pub mod container;
pub mod host;
pub mod reader;

pub use config::ReadOptions;
#[cfg(feature = "mmap")]
pub use container::ContainerFile;
#[cfg(feature = "hdf5")]
pub use container::Hdf5Source;
pub use container::ContainerWriter;
pub use host::{CooHost, HostObject, SvtHost};
pub use reader::{CscDatasetPaths, CscReader, CsvReader, MtxReader, TenxBundle};

/// Input kinds recognised by [`read_sparse_matrix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Directory holding `matrix.mtx`, barcodes and features
    TenxBundle,
    /// `.csv` or `.csv.gz`
    Csv,
    /// `.mtx` or `.mtx.gz`
    MatrixMarket,
    /// `.csc` native container
    Container,
    /// `.h5` or `.hdf5`
    Hdf5,
}

impl InputKind {
    /// Classify a path by whether it is a directory, then by extension
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(InputKind::TenxBundle);
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let stem = name.strip_suffix(".gz").unwrap_or(&name);
        let extension = stem.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match extension {
            "csv" => Ok(InputKind::Csv),
            "mtx" => Ok(InputKind::MatrixMarket),
            "csc" if stem.len() == name.len() => Ok(InputKind::Container),
            "h5" | "hdf5" if stem.len() == name.len() => Ok(InputKind::Hdf5),
            _ => Err(SpcountError::InvalidArgument(format!(
                "unsupported input {}; expected a 10x directory, .csv, .mtx, .csc or .h5",
                path.display()
            ))),
        }
    }
}

/// Read a CSC matrix from any dataset source into `builder`
pub fn read_csc_into<S: DatasetSource, B: MatrixBuilder>(
    source: S,
    options: &ReadOptions,
    builder: &mut B,
) -> Result<()> {
    CscReader::new(source, CscDatasetPaths::for_options(options)).read_into(builder)
}

/// Read a sparse matrix from `path`, choosing the reader from the input kind
///
/// The file, decoder and mapping handles are released before this returns,
/// whether it succeeds or not.
pub fn read_sparse_matrix(path: impl AsRef<Path>, options: &ReadOptions) -> Result<DynamicMatrix> {
    let path = path.as_ref();
    let kind = InputKind::detect(path)?;
    tracing::debug!(path = %path.display(), ?kind, representation = %options.representation, "reading sparse matrix");

    let mut builder =
        DynamicBuilder::new(options.representation).with_lacunar_leaves(options.lacunar_leaves);
    match kind {
        InputKind::TenxBundle => TenxBundle::open(path, options)?.read_into(&mut builder)?,
        InputKind::Csv => CsvReader::from_path(path)?.read_into(&mut builder)?,
        InputKind::MatrixMarket => MtxReader::from_path(path)?.read_into(&mut builder)?,
        InputKind::Container => read_container_into(path, options, &mut builder)?,
        InputKind::Hdf5 => read_hdf5_into(path, options, &mut builder)?,
    }
    builder.finalize()
}

#[cfg(feature = "mmap")]
fn read_container_into(path: &Path, options: &ReadOptions, builder: &mut DynamicBuilder) -> Result<()> {
    read_csc_into(ContainerFile::open(path)?, options, builder)
}

#[cfg(not(feature = "mmap"))]
fn read_container_into(_: &Path, _: &ReadOptions, _: &mut DynamicBuilder) -> Result<()> {
    Err(SpcountError::InvalidArgument(
        "reading .csc containers requires the `mmap` feature".into(),
    ))
}

#[cfg(feature = "hdf5")]
fn read_hdf5_into(path: &Path, options: &ReadOptions, builder: &mut DynamicBuilder) -> Result<()> {
    read_csc_into(Hdf5Source::open(path)?, options, builder)
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5_into(_: &Path, _: &ReadOptions, _: &mut DynamicBuilder) -> Result<()> {
    Err(SpcountError::InvalidArgument(
        "reading .h5 files requires the `hdf5` feature".into(),
    ))
}

/// Write a finalized SVT matrix as a `.csc` container
pub fn write_container(path: impl AsRef<Path>, matrix: &SvtMatrix<i32>) -> Result<()> {
    ContainerWriter::from_svt(matrix)?.write(path)
}
