use crate::podspec::Spec;
use serde::Deserialize;
use serde_json::Value;

/// Owner back-pointer from `metadata.ownerReferences`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OwnerRef {
    pub kind: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub owner_references: Vec<OwnerRef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Status {
    pub phase: Option<String>,
}

/// The slice of an unstructured object that dependency analysis reads
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ObjectView {
    pub kind: Option<String>,
    pub metadata: Meta,
    pub spec: Spec,
    pub status: Status,
}

/// Consumed object shapes, dispatched on by the classifier.
///
/// `Workload` is any kind carrying a pod template; the borrowed spec is the
/// template's, not the outer object's.
#[derive(Debug)]
pub enum Shape<'a> {
    Pod(&'a Spec),
    Workload(&'a Spec),
    Claim {
        phase: Option<&'a str>,
        volume_name: Option<&'a str>,
    },
    Opaque,
}

impl ObjectView {
    /// Malformed input (wrong field types) is `None`, never an error
    pub fn from_value(value: &Value) -> Option<ObjectView> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Lower-cased kind tag, empty when the object carries no kind
    pub fn kind_tag(&self) -> String {
        self.kind.as_deref().unwrap_or("").to_ascii_lowercase()
    }

    pub fn shape(&self) -> Shape<'_> {
        match self.kind_tag().as_str() {
            "pod" => Shape::Pod(&self.spec),
            "persistentvolumeclaim" => Shape::Claim {
                phase: self.status.phase.as_deref(),
                volume_name: self.spec.volume_name.as_deref(),
            },
            _ => match &self.spec.template {
                Some(template) => Shape::Workload(&template.spec),
                None => Shape::Opaque,
            },
        }
    }

    /// Owner references with both kind and name present
    pub fn owners(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.owner_references.iter().filter_map(|o| {
            match (o.kind.as_deref(), o.name.as_deref()) {
                (Some(kind), Some(name)) => Some((kind, name)),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectView, Shape};
    use serde_json::json;

    #[test]
    fn pod_shape() {
        let view = ObjectView::from_value(&json!({
            "kind": "Pod",
            "metadata": { "name": "nginx-pod", "namespace": "default" },
            "spec": { "volumes": [{ "name": "cfg", "configMap": { "name": "app-config" } }] },
        }))
        .unwrap();
        match view.shape() {
            Shape::Pod(spec) => assert_eq!(spec.volumes[0].config_map_name(), Some("app-config")),
            other => panic!("expected pod shape, got {:?}", other),
        }
    }

    #[test]
    fn workload_shape_uses_template_spec() {
        let view = ObjectView::from_value(&json!({
            "kind": "Deployment",
            "metadata": { "name": "app" },
            "spec": {
                "replicas": 3,
                "template": {
                    "spec": { "volumes": [{ "name": "cfg", "configMap": { "name": "app-config" } }] },
                },
            },
        }))
        .unwrap();
        match view.shape() {
            Shape::Workload(spec) => assert_eq!(spec.volumes[0].config_map_name(), Some("app-config")),
            other => panic!("expected workload shape, got {:?}", other),
        }
    }

    #[test]
    fn claim_shape() {
        let view = ObjectView::from_value(&json!({
            "kind": "PersistentVolumeClaim",
            "metadata": { "name": "data-pvc" },
            "spec": { "volumeName": "pv-001" },
            "status": { "phase": "Bound" },
        }))
        .unwrap();
        match view.shape() {
            Shape::Claim { phase, volume_name } => {
                assert_eq!(phase, Some("Bound"));
                assert_eq!(volume_name, Some("pv-001"));
            }
            other => panic!("expected claim shape, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_default_to_empty_view() {
        let view = ObjectView::from_value(&json!({ "kind": "Pod" })).unwrap();
        assert!(view.spec.volumes.is_empty());
        assert!(view.metadata.owner_references.is_empty());
        assert!(matches!(view.shape(), Shape::Pod(_)));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        assert!(ObjectView::from_value(&json!({ "kind": "Pod", "spec": { "volumes": 3 } })).is_none());
        assert!(ObjectView::from_value(&json!("just a string")).is_none());
    }

    #[test]
    fn owners_skip_malformed_entries() {
        let view = ObjectView::from_value(&json!({
            "kind": "Pod",
            "metadata": {
                "name": "p",
                "ownerReferences": [
                    { "kind": "ReplicaSet", "name": "app-rs" },
                    { "kind": "ReplicaSet" },
                    { "name": "nameless" },
                ],
            },
        }))
        .unwrap();
        let owners: Vec<_> = view.owners().collect();
        assert_eq!(owners, vec![("ReplicaSet", "app-rs")]);
    }
}
