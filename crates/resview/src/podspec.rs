use serde::Deserialize;

/// Reference to an object by name, as used inside volume and env sources
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NameRef {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretSource {
    pub secret_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimSource {
    pub claim_name: Option<String>,
}

/// One entry of `spec.volumes`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Volume {
    pub name: Option<String>,
    pub config_map: Option<NameRef>,
    pub secret: Option<SecretSource>,
    pub persistent_volume_claim: Option<ClaimSource>,
}

impl Volume {
    pub fn config_map_name(&self) -> Option<&str> {
        self.config_map.as_ref()?.name.as_deref()
    }
    pub fn secret_name(&self) -> Option<&str> {
        self.secret.as_ref()?.secret_name.as_deref()
    }
    pub fn claim_name(&self) -> Option<&str> {
        self.persistent_volume_claim.as_ref()?.claim_name.as_deref()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvVarSource {
    pub config_map_key_ref: Option<NameRef>,
    pub secret_key_ref: Option<NameRef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvVar {
    pub name: Option<String>,
    pub value_from: Option<EnvVarSource>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvFromSource {
    pub config_map_ref: Option<NameRef>,
    pub secret_ref: Option<NameRef>,
}

/// One entry of `spec.containers`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    pub name: Option<String>,
    pub env: Vec<EnvVar>,
    pub env_from: Vec<EnvFromSource>,
}

impl Container {
    /// Does any env entry pull values out of the named ConfigMap?
    pub fn references_config_map(&self, name: &str) -> bool {
        let key_ref = self.env.iter().filter_map(|e| e.value_from.as_ref());
        if key_ref
            .filter_map(|v| v.config_map_key_ref.as_ref())
            .any(|r| r.name.as_deref() == Some(name))
        {
            return true;
        }
        self.env_from
            .iter()
            .filter_map(|e| e.config_map_ref.as_ref())
            .any(|r| r.name.as_deref() == Some(name))
    }

    /// Does any env entry pull values out of the named Secret?
    pub fn references_secret(&self, name: &str) -> bool {
        let key_ref = self.env.iter().filter_map(|e| e.value_from.as_ref());
        if key_ref
            .filter_map(|v| v.secret_key_ref.as_ref())
            .any(|r| r.name.as_deref() == Some(name))
        {
            return true;
        }
        self.env_from
            .iter()
            .filter_map(|e| e.secret_ref.as_ref())
            .any(|r| r.name.as_deref() == Some(name))
    }
}

/// The fields of an object `spec` consumed by dependency analysis.
///
/// Pods carry `volumes`/`containers` directly, workloads carry them one level
/// down in `template.spec`, claims carry `volumeName`. All of them share this
/// view, with unrelated fields defaulted away.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spec {
    pub volumes: Vec<Volume>,
    pub containers: Vec<Container>,
    pub template: Option<Box<Template>>,
    pub volume_name: Option<String>,
}

/// Pod template embedded in workload kinds (Deployment, StatefulSet, ...)
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Template {
    pub spec: Spec,
}

#[cfg(test)]
mod tests {
    use super::Spec;
    use serde_json::json;

    #[test]
    fn volume_sources() {
        let spec: Spec = serde_json::from_value(json!({
            "volumes": [
                { "name": "cfg", "configMap": { "name": "app-config" } },
                { "name": "creds", "secret": { "secretName": "db-creds" } },
                { "name": "data", "persistentVolumeClaim": { "claimName": "data-pvc" } },
                { "name": "scratch", "emptyDir": {} },
            ],
        }))
        .unwrap();

        assert_eq!(spec.volumes[0].config_map_name(), Some("app-config"));
        assert_eq!(spec.volumes[1].secret_name(), Some("db-creds"));
        assert_eq!(spec.volumes[2].claim_name(), Some("data-pvc"));
        assert_eq!(spec.volumes[3].config_map_name(), None);
        assert_eq!(spec.volumes[3].claim_name(), None);
    }

    #[test]
    fn env_references() {
        let spec: Spec = serde_json::from_value(json!({
            "containers": [{
                "name": "main",
                "env": [
                    { "name": "DB_HOST", "valueFrom": { "configMapKeyRef": { "name": "app-config", "key": "host" } } },
                ],
                "envFrom": [
                    { "secretRef": { "name": "db-creds" } },
                ],
            }],
        }))
        .unwrap();

        assert!(spec.containers[0].references_config_map("app-config"));
        assert!(!spec.containers[0].references_config_map("other"));
        assert!(spec.containers[0].references_secret("db-creds"));
        assert!(!spec.containers[0].references_secret("app-config"));
    }

    #[test]
    fn empty_spec_defaults() {
        let spec: Spec = serde_json::from_value(json!({})).unwrap();
        assert!(spec.volumes.is_empty());
        assert!(spec.containers.is_empty());
        assert!(spec.template.is_none());
    }
}
