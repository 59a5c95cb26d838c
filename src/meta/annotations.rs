//! Filtering of provider-managed annotations.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tracing::trace;

/// Domain reserved for annotations injected by the cluster itself.
pub const RESERVED_ANNOTATION_DOMAIN: &str = "kubernetes.io";

static DEFAULT_FILTER: Lazy<AnnotationFilter> = Lazy::new(AnnotationFilter::default);

/// AnnotationFilter decides which annotation keys are system-managed.
///
/// A key is internal when the host-like prefix before its first `/` is one
/// of the reserved domains or a subdomain of one, e.g.
/// `pv.kubernetes.io/bound-by-controller`.
///
/// Matching is per domain segment, not a plain string suffix of the host, so
/// `notkubernetes.io/x` is a user key. Hosts holding characters other than
/// letters, digits and `.-_~` (URL sub-delimiters such as `+` included) are
/// treated as malformed and never internal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFilter {
    reserved_domains: Vec<String>,
}

impl Default for AnnotationFilter {
    fn default() -> Self {
        AnnotationFilter {
            reserved_domains: vec![RESERVED_ANNOTATION_DOMAIN.to_string()],
        }
    }
}

impl AnnotationFilter {
    /// Creates a filter reserving the given domains.
    pub fn new<I, S>(reserved_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnnotationFilter {
            reserved_domains: reserved_domains
                .into_iter()
                .map(Into::into)
                .map(|d: String| d.trim_matches('.').to_string())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Returns the process-wide filter reserving `kubernetes.io`.
    pub fn global() -> &'static AnnotationFilter {
        &DEFAULT_FILTER
    }

    pub fn reserved_domains(&self) -> &[String] {
        &self.reserved_domains
    }

    /// Returns true if `key` belongs to a reserved domain.
    ///
    /// Keys whose prefix cannot be read as a host name are never internal.
    pub fn is_internal(&self, key: &str) -> bool {
        let Some(host) = annotation_host(key) else {
            return false;
        };
        self.reserved_domains.iter().any(|domain| {
            host == domain.as_str()
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// Drops every internal key from `m`.
    pub fn filter(&self, mut m: BTreeMap<String, String>) -> BTreeMap<String, String> {
        m.retain(|k, _| {
            let internal = self.is_internal(k);
            if internal {
                trace!(key = %k, "dropping internal annotation");
            }
            !internal
        });
        m
    }
}

/// Extracts the host-like component of an annotation key: the text before
/// the first `/`, without any `user@` prefix or numeric `:port`.
fn annotation_host(key: &str) -> Option<&str> {
    let authority = key.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = match host.rsplit_once(':') {
        Some((h, port)) if port.bytes().all(|b| b.is_ascii_digit()) => h,
        Some(_) => return None,
        None => host,
    };
    let valid = !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b'~'));
    valid.then_some(host)
}

/// Returns true if `key` is a system-managed annotation key.
pub fn is_internal_annotation_key(key: &str) -> bool {
    AnnotationFilter::global().is_internal(key)
}

/// Removes system-managed annotations from `m`.
///
/// The map is taken by value, so callers keep their own copy unfiltered
/// unless they hand it over.
pub fn filter_annotations(m: BTreeMap<String, String>) -> BTreeMap<String, String> {
    AnnotationFilter::global().filter(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_keys() {
        assert!(is_internal_annotation_key("pv.kubernetes.io/bound-by-controller"));
        assert!(is_internal_annotation_key("kubernetes.io/change-cause"));
        assert!(is_internal_annotation_key("deployment.kubernetes.io/revision"));
        assert!(is_internal_annotation_key("kubernetes.io"));
    }

    #[test]
    fn test_user_keys() {
        assert!(!is_internal_annotation_key("team/owner"));
        assert!(!is_internal_annotation_key("owner"));
        assert!(!is_internal_annotation_key(""));
        assert!(!is_internal_annotation_key("example.com/kubernetes.io"));
        assert!(!is_internal_annotation_key("notkubernetes.io/x"));
    }

    #[test]
    fn test_malformed_keys_are_not_internal() {
        assert!(!is_internal_annotation_key("bad host.kubernetes.io/x"));
        assert!(!is_internal_annotation_key("pv.kubernetes.io:http/x"));
        assert!(!is_internal_annotation_key("/kubernetes.io"));
        assert!(!is_internal_annotation_key("a+b.kubernetes.io/x"));
    }

    #[test]
    fn test_userinfo_and_port_are_ignored() {
        assert!(is_internal_annotation_key("user@pv.kubernetes.io/x"));
        assert!(is_internal_annotation_key("pv.kubernetes.io:8080/x"));
    }

    #[test]
    fn test_filter_annotations() {
        let mut m = BTreeMap::new();
        m.insert("pv.kubernetes.io/bound-by-controller".to_string(), "yes".to_string());
        m.insert("team/owner".to_string(), "infra".to_string());
        m.insert("kubectl.kubernetes.io/last-applied-configuration".to_string(), "{}".to_string());

        let filtered = filter_annotations(m);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered["team/owner"], "infra");
        assert!(filtered.keys().all(|k| !is_internal_annotation_key(k)));
    }

    #[test]
    fn test_custom_reserved_domains() {
        let filter = AnnotationFilter::new(["example.com", ".corp.internal.", ""]);
        assert_eq!(filter.reserved_domains(), ["example.com", "corp.internal"]);

        assert!(filter.is_internal("example.com/a"));
        assert!(filter.is_internal("build.corp.internal/id"));
        assert!(!filter.is_internal("pv.kubernetes.io/bound-by-controller"));
    }
}
