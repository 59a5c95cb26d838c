//! Resource lists: resource name to quantity.

use std::collections::BTreeMap;
use tracing::debug;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ApiQuantity;

use super::quantity::{Quantity, QuantityError};
use crate::error::{Error, Result};
use crate::value::Map;

/// ResourceList maps a resource name such as `cpu` or `memory` to its
/// parsed quantity.
pub type ResourceList = BTreeMap<String, Quantity>;

/// Renders every quantity in its canonical string form.
pub fn flatten_resource_list(l: &ResourceList) -> BTreeMap<String, String> {
    debug!(input = ?l, "flattening resource list");
    let out: BTreeMap<String, String> = l.iter().map(|(k, v)| (k.clone(), v.to_string())).collect();
    debug!(output = ?out, "flattened resource list");
    out
}

/// Parses every value of a generic map as a quantity.
///
/// The conversion is atomic: the first non-string value or invalid
/// quantity fails the whole call and no partial list is returned.
pub fn expand_map_to_resource_list(m: &Map) -> Result<ResourceList> {
    debug!(input = ?m, "expanding resource list");
    let mut out = ResourceList::new();
    for (key, value) in m.iter() {
        let raw = value.expect_str(key)?;
        let quantity = raw
            .parse::<Quantity>()
            .map_err(|e| Error::quantity_parse(key.as_str(), raw, e))?;
        out.insert(key.clone(), quantity);
    }
    debug!(output = ?out, "expanded resource list");
    Ok(out)
}

/// Converts to the API model's resource list.
pub fn resource_list_to_api(l: &ResourceList) -> BTreeMap<String, ApiQuantity> {
    l.iter().map(|(k, v)| (k.clone(), v.to_api())).collect()
}

/// Parses a resource list as returned by the API.
pub fn resource_list_from_api(l: &BTreeMap<String, ApiQuantity>) -> Result<ResourceList> {
    l.iter()
        .map(|(k, v)| {
            Quantity::try_from(v)
                .map(|q| (k.clone(), q))
                .map_err(|e: QuantityError| Error::quantity_parse(k.as_str(), v.0.as_str(), e))
        })
        .collect()
}
