//! Data model and on-disk format definitions
//!
//! This module contains pure data structure definitions: matrix metadata,
//! nonzero entries and the CSC container layout. No I/O operations.

pub mod constants;
pub mod container;
pub mod entry;
pub mod metadata;

pub use container::{ContainerHeader, DatasetDescriptor, DatasetDtype, DatasetIndex};
pub use entry::NonZeroEntry;
pub use metadata::{Dimnames, MatrixMetadata};
