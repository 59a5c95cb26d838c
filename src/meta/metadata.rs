//! Expansion and flattening of object metadata blocks.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

use super::annotations::AnnotationFilter;
use crate::convert::expand_string_map;
use crate::error::Result;
use crate::value::{Map, Value};

/// Expands a metadata block into object metadata.
///
/// `block` is the single-element list the configuration schema uses for
/// nested blocks; an empty list yields empty metadata. Reserved annotations
/// are dropped silently.
pub fn expand_metadata(block: &[Value]) -> Result<ObjectMeta> {
    expand_metadata_with(block, AnnotationFilter::global())
}

/// Like [`expand_metadata`], with an explicit annotation filter.
pub fn expand_metadata_with(block: &[Value], filter: &AnnotationFilter) -> Result<ObjectMeta> {
    let Some(first) = block.first() else {
        return Ok(ObjectMeta::default());
    };
    let m = first.expect_map("metadata")?;

    let annotations = m
        .get_map("annotations")?
        .map(expand_string_map)
        .transpose()?
        .map(|a| filter.filter(a));
    let labels = m.get_map("labels")?.map(expand_string_map).transpose()?;

    Ok(ObjectMeta {
        name: non_empty(m.get_str("name")?),
        namespace: non_empty(m.get_str("namespace")?),
        generate_name: non_empty(m.get_str("generate_name")?),
        annotations: annotations.filter(|a| !a.is_empty()),
        labels: labels.filter(|l| !l.is_empty()),
        ..Default::default()
    })
}

/// Flattens object metadata into a single-element metadata block.
///
/// Annotations and labels are always present; `generate_name` and
/// `namespace` only when set. Read-only fields are included so they show up
/// in state.
pub fn flatten_metadata(meta: &ObjectMeta) -> Vec<Value> {
    flatten_metadata_with(meta, AnnotationFilter::global())
}

/// Like [`flatten_metadata`], with an explicit annotation filter.
pub fn flatten_metadata_with(meta: &ObjectMeta, filter: &AnnotationFilter) -> Vec<Value> {
    let mut m = Map::new();

    let annotations = filter.filter(meta.annotations.clone().unwrap_or_default());
    m.set("annotations", annotations);
    if let Some(generate_name) = non_empty(meta.generate_name.as_deref()) {
        m.set("generate_name", generate_name);
    }
    m.set("labels", meta.labels.clone().unwrap_or_else(BTreeMap::new));
    m.set("name", meta.name.clone().unwrap_or_default());
    m.set("resource_version", meta.resource_version.clone().unwrap_or_default());
    m.set("self_link", meta.self_link.clone().unwrap_or_default());
    m.set("uid", meta.uid.as_ref().map(ToString::to_string).unwrap_or_default());
    m.set("generation", meta.generation.unwrap_or_default());
    if let Some(namespace) = non_empty(meta.namespace.as_deref()) {
        m.set("namespace", namespace);
    }

    vec![Value::Map(m)]
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}
