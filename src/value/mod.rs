//! Value module - In-memory representation of generic configuration blocks.
//!
//! This module provides typed, fallible access to untyped values.

mod value;

pub use value::*;
