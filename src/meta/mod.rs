//! Meta module - Object metadata conversions.
//!
//! This module provides the `namespace/name` identifier codec, expansion and
//! flattening of metadata blocks, and filtering of system-managed
//! annotations.

mod annotations;
mod id;
mod metadata;

#[cfg(test)]
mod metadata_test;

pub use annotations::*;
pub use id::*;
pub use metadata::*;
