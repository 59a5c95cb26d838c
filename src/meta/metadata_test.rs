//! Tests for metadata expansion and flattening.

#[cfg(test)]
mod tests {
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    use crate::error::Error;
    use crate::meta::{
        expand_metadata, expand_metadata_with, filter_annotations, flatten_metadata,
        AnnotationFilter,
    };
    use crate::value::{from_yaml, Map, Value};

    fn block(yaml: &str) -> Vec<Value> {
        let value = from_yaml(yaml).expect("test block must be valid YAML");
        value.as_list().cloned().expect("test block must be a list")
    }

    fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn flattened(meta: &ObjectMeta) -> Map {
        let out = flatten_metadata(meta);
        assert_eq!(out.len(), 1, "flatten must produce exactly one block");
        out[0].as_map().cloned().expect("flattened block must be a map")
    }

    #[test]
    fn test_expand_empty_block() {
        assert_eq!(expand_metadata(&[]).unwrap(), ObjectMeta::default());
    }

    #[test]
    fn test_expand_metadata() {
        let meta = expand_metadata(&block(
            r#"
- name: web
  namespace: prod
  generate_name: web-
  labels:
    app: web
  annotations:
    team/owner: infra
    pv.kubernetes.io/bound-by-controller: "yes"
"#,
        ))
        .unwrap();

        assert_eq!(meta.name.as_deref(), Some("web"));
        assert_eq!(meta.namespace.as_deref(), Some("prod"));
        assert_eq!(meta.generate_name.as_deref(), Some("web-"));
        assert_eq!(meta.labels, Some(string_map(&[("app", "web")])));
        assert_eq!(meta.annotations, Some(string_map(&[("team/owner", "infra")])));
        assert_eq!(meta.uid, None);
        assert_eq!(meta.resource_version, None);
    }

    #[test]
    fn test_expand_missing_keys_are_zero_values() {
        let meta = expand_metadata(&block("- name: only-name\n")).unwrap();
        assert_eq!(
            meta,
            ObjectMeta {
                name: Some("only-name".into()),
                ..Default::default()
            }
        );

        let meta = expand_metadata(&block("- name: \"\"\n  labels: {}\n")).unwrap();
        assert_eq!(meta, ObjectMeta::default());
    }

    #[test]
    fn test_expand_type_mismatch() {
        let err = expand_metadata(&block("- name: 42\n")).unwrap_err();
        assert_eq!(err, Error::type_mismatch("name", "string", "int"));

        let err = expand_metadata(&block("- labels:\n    replicas: 3\n")).unwrap_err();
        assert_eq!(err, Error::type_mismatch("replicas", "string", "int"));

        let err = expand_metadata(&block("- labels: [a]\n")).unwrap_err();
        assert_eq!(err, Error::type_mismatch("labels", "map", "list"));

        let err = expand_metadata(&[Value::from("metadata")]).unwrap_err();
        assert_eq!(err, Error::type_mismatch("metadata", "map", "string"));
    }

    #[test]
    fn test_expand_with_custom_filter() {
        let filter = AnnotationFilter::new(["example.com"]);
        let meta = expand_metadata_with(
            &block("- annotations:\n    example.com/a: x\n    pv.kubernetes.io/b: y\n"),
            &filter,
        )
        .unwrap();
        assert_eq!(meta.annotations, Some(string_map(&[("pv.kubernetes.io/b", "y")])));
    }

    #[test]
    fn test_flatten_metadata() {
        let meta = ObjectMeta {
            name: Some("web".into()),
            namespace: Some("prod".into()),
            labels: Some(string_map(&[("app", "web")])),
            annotations: Some(string_map(&[
                ("team/owner", "infra"),
                ("deployment.kubernetes.io/revision", "3"),
            ])),
            resource_version: Some("12345".into()),
            self_link: Some("/api/v1/namespaces/prod/pods/web".into()),
            uid: Some("5f3c9a52-0f0e-4c59-9d6e-0d1c8b1f7a11".into()),
            generation: Some(4),
            ..Default::default()
        };

        let m = flattened(&meta);
        assert_eq!(m.get("name"), Some(&Value::from("web")));
        assert_eq!(m.get("namespace"), Some(&Value::from("prod")));
        assert_eq!(m.get("generate_name"), None);
        assert_eq!(m.get("labels"), Some(&Value::from(string_map(&[("app", "web")]))));
        assert_eq!(
            m.get("annotations"),
            Some(&Value::from(string_map(&[("team/owner", "infra")])))
        );
        assert_eq!(m.get("resource_version"), Some(&Value::from("12345")));
        assert_eq!(
            m.get("self_link"),
            Some(&Value::from("/api/v1/namespaces/prod/pods/web"))
        );
        assert_eq!(
            m.get("uid"),
            Some(&Value::from("5f3c9a52-0f0e-4c59-9d6e-0d1c8b1f7a11"))
        );
        assert_eq!(m.get("generation"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_flatten_empty_metadata() {
        let m = flattened(&ObjectMeta::default());

        assert_eq!(m.get("annotations"), Some(&Value::Map(Map::new())));
        assert_eq!(m.get("labels"), Some(&Value::Map(Map::new())));
        assert_eq!(m.get("name"), Some(&Value::from("")));
        assert_eq!(m.get("generation"), Some(&Value::Int(0)));
        assert!(!m.has("namespace"));
        assert!(!m.has("generate_name"));
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            "- name: web\n  namespace: prod\n  labels:\n    app: web\n  annotations:\n    team/owner: infra\n",
            "- name: runner\n  generate_name: job-\n  namespace: batch\n  labels: {}\n  annotations: {}\n",
            "- name: mixed\n  labels:\n    tier: db\n  annotations:\n    a: b\n    kubernetes.io/change-cause: rollout\n",
        ];

        for case in cases {
            let input = block(case);
            let input_map = input[0].as_map().unwrap();
            let out = flattened(&expand_metadata(&input).unwrap());

            for key in ["name", "namespace", "generate_name"] {
                assert_eq!(
                    out.get_str(key).unwrap(),
                    input_map.get_str(key).unwrap(),
                    "{} differs for {:?}",
                    key,
                    case
                );
            }
            assert_eq!(out.get("labels"), input_map.get("labels"), "labels differ for {:?}", case);

            let input_annotations = crate::convert::expand_string_map(
                input_map.get_map("annotations").unwrap().unwrap(),
            )
            .unwrap();
            assert_eq!(
                out.get("annotations"),
                Some(&Value::from(filter_annotations(input_annotations))),
                "annotations differ for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_reserved_annotations_never_surface() {
        // A reserved annotation set out of band is invisible in both
        // directions.
        let meta = ObjectMeta {
            annotations: Some(string_map(&[("kubernetes.io/description", "set by hand")])),
            ..Default::default()
        };
        assert_eq!(flattened(&meta).get("annotations"), Some(&Value::Map(Map::new())));

        let expanded =
            expand_metadata(&block("- annotations:\n    kubernetes.io/description: x\n")).unwrap();
        assert_eq!(expanded.annotations, None);
    }
}
