//! Compressed-sparse-column reader over named datasets
//!
//! Four datasets form the matrix: row indices and values (one per stored
//! entry), column pointers (`ncol + 1` offsets) and a two-element shape.
//! Optional string datasets carry row and column labels.

use spcount_core::format::constants::{csc, MAX_DIMENSION};
use spcount_core::validation::validate_column_pointers;
use spcount_core::{
    DatasetSource, FormatReader, MatrixBuilder, MatrixMetadata, NonZeroEntry, Result,
    SpcountError,
};

use crate::config::ReadOptions;

/// Dataset paths making up one CSC matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscDatasetPaths {
    pub indices: String,
    pub data: String,
    pub indptr: String,
    pub shape: String,
    pub row_names: Option<String>,
    pub col_names: Option<String>,
}

impl CscDatasetPaths {
    /// Layout of a current 10x container rooted at `group`
    pub fn for_group(group: &str, use_id_row_names: bool) -> Self {
        let features = if use_id_row_names {
            csc::FEATURE_IDS
        } else {
            csc::FEATURE_NAMES
        };
        Self {
            indices: format!("{group}/{}", csc::INDICES),
            data: format!("{group}/{}", csc::DATA),
            indptr: format!("{group}/{}", csc::INDPTR),
            shape: format!("{group}/{}", csc::SHAPE),
            row_names: Some(format!("{group}/{features}")),
            col_names: Some(format!("{group}/{}", csc::BARCODES)),
        }
    }

    /// Layout of a legacy container keyed by genome name
    pub fn for_genome(genome: &str, use_id_row_names: bool) -> Self {
        let genes = if use_id_row_names {
            csc::GENE_IDS
        } else {
            csc::GENE_NAMES
        };
        Self {
            row_names: Some(format!("{genome}/{genes}")),
            ..Self::for_group(genome, use_id_row_names)
        }
    }

    /// Pick the layout described by `options`
    pub fn for_options(options: &ReadOptions) -> Self {
        let mut paths = match &options.genome {
            Some(genome) => Self::for_genome(genome, options.use_id_row_names),
            None => Self::for_group(csc::DEFAULT_GROUP, options.use_id_row_names),
        };
        if !options.use_barcode_col_names {
            paths.col_names = None;
        }
        paths
    }

    /// Skip both label datasets
    pub fn without_labels(mut self) -> Self {
        self.row_names = None;
        self.col_names = None;
        self
    }
}

impl Default for CscDatasetPaths {
    fn default() -> Self {
        Self::for_group(csc::DEFAULT_GROUP, true)
    }
}

/// Reader decoding a CSC matrix from any [`DatasetSource`]
pub struct CscReader<S> {
    source: S,
    paths: CscDatasetPaths,
}

impl<S: DatasetSource> CscReader<S> {
    pub fn new(source: S, paths: CscDatasetPaths) -> Self {
        Self { source, paths }
    }

    fn read_labels(&self, path: Option<&str>) -> Result<Vec<String>> {
        let Some(path) = path else {
            return Ok(Vec::new());
        };
        match self.source.read_optional_strings(path)? {
            Some(labels) => Ok(labels),
            None => {
                tracing::warn!(dataset = path, "label dataset not found; continuing without labels");
                Ok(Vec::new())
            }
        }
    }
}

fn dimension(path: &str, value: u64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&dim| dim <= MAX_DIMENSION)
        .ok_or_else(|| {
            SpcountError::dataset(
                path,
                format!("dimension {value} exceeds the supported maximum of {MAX_DIMENSION}"),
            )
        })
}

impl<S: DatasetSource> FormatReader for CscReader<S> {
    fn read_into<B: MatrixBuilder>(self, builder: &mut B) -> Result<()> {
        let paths = &self.paths;
        let indices = self.source.read_u32(&paths.indices)?;
        let data = self.source.read_u32(&paths.data)?;
        let indptr = self.source.read_u32(&paths.indptr)?;
        let shape = self.source.read_u64(&paths.shape)?;

        if shape.len() != 2 {
            return Err(SpcountError::dataset(
                &paths.shape,
                format!("expected 2 elements but found {}", shape.len()),
            ));
        }
        let nrow = dimension(&paths.shape, shape[0])?;
        let ncol = dimension(&paths.shape, shape[1])?;

        if indices.len() != data.len() {
            return Err(SpcountError::Consistency {
                what: "row index count (number of values)",
                expected: data.len(),
                actual: indices.len(),
            });
        }
        let nnz = data.len();
        validate_column_pointers(&paths.indptr, &indptr, ncol, nnz)?;

        let nval = data.iter().filter(|&&v| v != 0).count();
        tracing::debug!(nrow, ncol, nnz, nval, "read CSC datasets");

        let mut metadata = MatrixMetadata::new(nrow, ncol, nval)
            .with_row_names(self.read_labels(paths.row_names.as_deref())?)
            .with_col_names(self.read_labels(paths.col_names.as_deref())?);
        metadata.reconcile_labels();
        builder.init(metadata)?;

        // Single forward scan: column c owns entries indptr[c]..indptr[c + 1]
        let mut col = 0usize;
        for (i, (&row, &value)) in indices.iter().zip(&data).enumerate() {
            while indptr[col + 1] as usize <= i {
                col += 1;
            }
            if value == 0 {
                continue;
            }
            let value = i32::try_from(value).map_err(|_| {
                SpcountError::dataset(&paths.data, format!("value {value} exceeds the i32 range"))
            })?;
            builder.add_entry(NonZeroEntry::new(
                row.saturating_add(1),
                col as u32 + 1,
                value,
            ))?;
        }
        Ok(())
    }
}
