//! Abstract interfaces
//!
//! This module defines the trait abstractions shared by the builders, the
//! readers and the storage backends.

pub mod builder;
pub mod element;
pub mod matrix;
pub mod source;

pub use builder::{BuilderState, FormatReader, MatrixBuilder};
pub use element::{MatrixElement, ValueType};
pub use matrix::{MatrixOperations, SparseMatrix};
pub use source::DatasetSource;
