//! In-memory sparse representations and their builders

pub mod coo;
pub mod dynamic;
pub mod svt;

pub use coo::{CooBuilder, CooMatrix};
pub use dynamic::{DynamicBuilder, DynamicMatrix, Representation};
pub use svt::{SvtBuilder, SvtColumn, SvtMatrix};
