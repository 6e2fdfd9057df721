//! Validation and parsing utilities
//!
//! This module contains pure validation functions with no I/O dependencies:
//! coordinate bounds, CSC column-pointer checks, container layout arithmetic
//! and text field parsing.

pub mod bounds;
pub mod format;
pub mod parsing;

pub use bounds::{check_entry_bounds, validate_column_pointers};
pub use format::align_to_boundary;
pub use parsing::{parse_integral, parse_mtx_banner, parse_usize, parse_value_field, MtxField};
