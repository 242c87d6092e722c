use serde_json::Value;
use std::fmt::{self, Display};

/// Uniquely addresses a resource within one cluster
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceId {
    pub kind: String,
    pub name: String,
    /// Absent for cluster-scoped kinds
    pub namespace: Option<String>,
}

impl ResourceId {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace,
        }
    }

    /// Lower-cased kind tag used for rule lookups
    pub fn kind_tag(&self) -> String {
        self.kind.to_ascii_lowercase()
    }

    /// Lenient extraction from an unstructured object; `None` on malformed input
    pub fn from_object(obj: &Value) -> Option<ResourceId> {
        let kind = obj.get("kind")?.as_str()?;
        let metadata = obj.get("metadata")?;
        let name = metadata.get("name")?.as_str()?;
        let namespace = metadata.get("namespace").and_then(Value::as_str);
        Some(ResourceId::new(kind, name, namespace.map(str::to_owned)))
    }

    /// Kind is compared case-insensitively, name and namespace exactly
    pub fn same_object(&self, kind: &str, name: &str, namespace: Option<&str>) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
            && self.name == name
            && self.namespace.as_deref() == namespace
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        if let Some(ns) = &self.namespace {
            write!(f, " in {}", ns)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceId;
    use serde_json::json;

    #[test]
    fn from_object() {
        let id = ResourceId::from_object(&json!({
            "kind": "ConfigMap",
            "metadata": { "name": "app-config", "namespace": "default" },
        }))
        .unwrap();
        assert_eq!(id.kind, "ConfigMap");
        assert_eq!(id.kind_tag(), "configmap");
        assert_eq!(id.to_string(), "ConfigMap app-config in default");
    }

    #[test]
    fn from_object_cluster_scoped() {
        let id = ResourceId::from_object(&json!({
            "kind": "PersistentVolume",
            "metadata": { "name": "pv-001" },
        }))
        .unwrap();
        assert_eq!(id.namespace, None);
        assert_eq!(id.to_string(), "PersistentVolume pv-001");
    }

    #[test]
    fn from_object_malformed() {
        assert_eq!(ResourceId::from_object(&json!({ "kind": "Pod" })), None);
        assert_eq!(ResourceId::from_object(&json!({ "metadata": { "name": "x" } })), None);
        assert_eq!(ResourceId::from_object(&json!(42)), None);
    }

    #[test]
    fn same_object_ignores_kind_case() {
        let id = ResourceId::new("ConfigMap", "app-config", Some("default".into()));
        assert!(id.same_object("configmap", "app-config", Some("default")));
        assert!(!id.same_object("configmap", "app-config", None));
        assert!(!id.same_object("Secret", "app-config", Some("default")));
    }
}
