//! spcount Core - Sparse Count Matrix Definitions
//!
//! This crate provides the data model, builders and validation rules for
//! sparse count matrices, independent of any file I/O:
//!
//! - [`format`]: metadata, entries and the binary container layout
//! - [`traits`]: builder, reader, element and dataset-source interfaces
//! - [`matrix`]: the COO and SVT representations and their builders
//! - [`normalize`]: per-column row ordering for SVT columns
//! - [`transform`]: elementwise transforms over SVT nonzeros
//! - [`validation`]: bounds, column-pointer and field-parsing checks

pub mod error;
pub mod format;
pub mod matrix;
pub mod normalize;
pub mod traits;
pub mod transform;
pub mod validation;

pub use error::*;
pub use format::*;
pub use matrix::*;
pub use normalize::{NormalizeOutcome, NormalizeStats, SvtNormalizer};
pub use traits::*;
pub use transform::{poisson_deviance, poisson_dispersion, svt_apply, Transform};
