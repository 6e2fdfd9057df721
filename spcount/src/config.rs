//! Read options shared by every input format

use std::path::Path;

use serde::{Deserialize, Serialize};
use spcount_core::{Representation, Result, SpcountError};

/// Options controlling how a matrix is read and which representation is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Read column labels from the barcodes dataset or file
    pub use_barcode_col_names: bool,
    /// Use feature IDs (rather than feature names) as row labels
    pub use_id_row_names: bool,
    /// Legacy genome group of a 10x v2 container; `None` selects the v3 layout
    pub genome: Option<String>,
    /// Read row labels from `features.tsv` rather than `genes.tsv`
    pub use_features_tsv: bool,
    /// Output representation
    pub representation: Representation,
    /// Encode all-ones SVT columns as lacunar leaves
    pub lacunar_leaves: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            use_barcode_col_names: true,
            use_id_row_names: true,
            genome: None,
            use_features_tsv: true,
            representation: Representation::Svt,
            lacunar_leaves: true,
        }
    }
}

impl ReadOptions {
    /// Set the output representation
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Toggle reading column labels from barcodes
    pub fn with_barcode_col_names(mut self, enabled: bool) -> Self {
        self.use_barcode_col_names = enabled;
        self
    }

    /// Toggle feature IDs as row labels
    pub fn with_id_row_names(mut self, enabled: bool) -> Self {
        self.use_id_row_names = enabled;
        self
    }

    /// Select a legacy genome group
    pub fn with_genome(mut self, genome: impl Into<String>) -> Self {
        self.genome = Some(genome.into());
        self
    }

    /// Choose `features.tsv` (true) or `genes.tsv` (false) in a 10x bundle
    pub fn with_features_tsv(mut self, enabled: bool) -> Self {
        self.use_features_tsv = enabled;
        self
    }

    /// Toggle lacunar encoding of all-ones SVT columns
    pub fn with_lacunar_leaves(mut self, enabled: bool) -> Self {
        self.lacunar_leaves = enabled;
        self
    }

    /// Parse options from a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SpcountError::InvalidArgument(format!("invalid read options: {e}")))
    }

    /// Load options from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SpcountError::io(format!("failed to read {}", path.display()), e))?;
        Self::from_json_str(&json)
    }
}
