//! # Kube Transcoder
//!
//! Conversion helpers between a generic, string-keyed configuration
//! representation and the Kubernetes resource model.
//!
//! Every conversion is a synchronous, stateless transformation. Failures are
//! returned as [`Error`] values, never panics.
//!
//! ## Modules
//!
//! - [`value`] - Generic configuration values with typed, fallible accessors
//! - [`meta`] - Object metadata expansion/flattening, identifiers and annotation filtering
//! - [`patch`] - JSON Patch operations for changed labels and annotations
//! - [`convert`] - String maps, base64, optional wrappers, resource quantities and access modes

pub mod convert;
pub mod error;
pub mod meta;
pub mod patch;
pub mod value;

pub use convert::{AccessMode, Quantity, QuantityError, ResourceList};
pub use error::{Error, Result};
pub use meta::{
    build_id, expand_metadata, filter_annotations, flatten_metadata, id_parts,
    is_internal_annotation_key, AnnotationFilter,
};
pub use patch::{diff_string_map, patch_metadata, ChangeSource, PatchOperation, PatchOperations, StateDiff};
pub use value::{Map, Value};
