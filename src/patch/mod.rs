//! Patch module - JSON Patch generation for mutable metadata.
//!
//! This module diffs prior and planned label/annotation maps into ordered
//! add/replace/remove operations.

mod change;
mod diff;
mod operation;

pub use change::*;
pub use diff::*;
pub use operation::*;
