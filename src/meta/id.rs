//! Composite `namespace/name` resource identifiers.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::error::{Error, Result};

/// Builds the `namespace/name` identifier of an object.
pub fn build_id(meta: &ObjectMeta) -> String {
    format!(
        "{}/{}",
        meta.namespace.as_deref().unwrap_or_default(),
        meta.name.as_deref().unwrap_or_default()
    )
}

/// Splits an identifier on its first `/` into `(namespace, name)`.
pub fn id_parts(id: &str) -> Result<(String, String)> {
    id.split_once('/')
        .map(|(namespace, name)| (namespace.to_string(), name.to_string()))
        .ok_or_else(|| Error::malformed_identifier(id))
}
