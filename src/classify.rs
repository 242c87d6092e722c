use crate::finding::{DependencyFinding, RelationKind, Severity};
use crate::identity::ResourceId;
use resview::{ObjectView, Shape, Spec, Volume};
use serde_json::Value;

/// One row of the dependency severity policy.
///
/// Which relation to which target kind carries which severity lives here and
/// nowhere else; teaching the classifier about a new resource kind is a data
/// addition, not a new code path.
struct Rule {
    target_kind: &'static str,
    relation: RelationKind,
    severity: Severity,
}

static RULES: &[Rule] = &[
    Rule {
        target_kind: "configmap",
        relation: RelationKind::Mount,
        severity: Severity::Error,
    },
    Rule {
        target_kind: "secret",
        relation: RelationKind::Mount,
        severity: Severity::Error,
    },
    Rule {
        target_kind: "persistentvolumeclaim",
        relation: RelationKind::Mount,
        severity: Severity::Error,
    },
    Rule {
        target_kind: "persistentvolumeclaim",
        relation: RelationKind::Reference,
        severity: Severity::Warning,
    },
];

fn severity_for(target_kind: &str, relation: RelationKind) -> Option<Severity> {
    RULES
        .iter()
        .find(|r| r.target_kind == target_kind && r.relation == relation)
        .map(|r| r.severity)
}

/// Find resources among `candidates` that reference or mount the target.
///
/// Kinds without modeled dependency rules yield an empty list; a malformed
/// candidate contributes nothing. Output is grouped by severity: mount errors
/// first, then reference warnings, then info.
pub fn classify_dependencies(
    target_kind: &str,
    target: &Value,
    candidates: &[Value],
) -> Vec<DependencyFinding> {
    let tag = target_kind.to_ascii_lowercase();
    let target_id = match ResourceId::from_object(target) {
        Some(id) => id,
        None => return Vec::new(),
    };

    let mut out = Vec::new();
    match tag.as_str() {
        "configmap" | "secret" => {
            collect_pod_consumers(&tag, &target_id, candidates, &mut out);
        }
        "persistentvolumeclaim" => {
            collect_pod_consumers(&tag, &target_id, candidates, &mut out);
            collect_claim_binding(&tag, &target_id, target, &mut out);
        }
        _ => {}
    }

    // stable sort, so order within a severity group follows candidate order
    out.sort_by_key(|f| f.severity.rank());
    out
}

fn volume_matches(tag: &str, target_name: &str, volume: &Volume) -> bool {
    match tag {
        "configmap" => volume.config_map_name() == Some(target_name),
        "secret" => volume.secret_name() == Some(target_name),
        "persistentvolumeclaim" => volume.claim_name() == Some(target_name),
        _ => false,
    }
}

fn env_matches(tag: &str, target_name: &str, spec: &Spec) -> bool {
    match tag {
        "configmap" => spec
            .containers
            .iter()
            .any(|c| c.references_config_map(target_name)),
        "secret" => spec
            .containers
            .iter()
            .any(|c| c.references_secret(target_name)),
        _ => false,
    }
}

/// At most one finding per consuming candidate, even when it references the
/// target through several volumes or containers
fn collect_pod_consumers(
    tag: &str,
    target_id: &ResourceId,
    candidates: &[Value],
    out: &mut Vec<DependencyFinding>,
) {
    let severity = match severity_for(tag, RelationKind::Mount) {
        Some(s) => s,
        None => return,
    };
    for candidate in candidates {
        let view = match ObjectView::from_value(candidate) {
            Some(v) => v,
            None => continue,
        };
        let (kind, name) = match (&view.kind, &view.metadata.name) {
            (Some(kind), Some(name)) => (kind.clone(), name.clone()),
            _ => continue,
        };
        let namespace = view.metadata.namespace.clone();
        if target_id.same_object(&kind, &name, namespace.as_deref()) {
            continue;
        }
        let spec = match view.shape() {
            Shape::Pod(spec) => spec,
            Shape::Workload(spec) => spec,
            _ => continue,
        };

        let description = if spec
            .volumes
            .iter()
            .any(|v| volume_matches(tag, &target_id.name, v))
        {
            format!(
                "{} {} mounts {} {} as a volume",
                kind, name, target_id.kind, target_id.name
            )
        } else if env_matches(tag, &target_id.name, spec) {
            format!(
                "{} {} reads {} {} through its container environment",
                kind, name, target_id.kind, target_id.name
            )
        } else {
            continue;
        };

        out.push(DependencyFinding {
            relation: RelationKind::Mount,
            related_kind: kind,
            related_name: name,
            related_namespace: namespace,
            description,
            severity,
        });
    }
}

/// A claim bound to a volume gets one advisory finding: the volume outlives
/// the claim but may be released or recycled once it is gone
fn collect_claim_binding(
    tag: &str,
    target_id: &ResourceId,
    target: &Value,
    out: &mut Vec<DependencyFinding>,
) {
    let severity = match severity_for(tag, RelationKind::Reference) {
        Some(s) => s,
        None => return,
    };
    let view = match ObjectView::from_value(target) {
        Some(v) => v,
        None => return,
    };
    if let Shape::Claim {
        phase: Some("Bound"),
        volume_name: Some(volume),
    } = view.shape()
    {
        out.push(DependencyFinding {
            relation: RelationKind::Reference,
            related_kind: "PersistentVolume".to_owned(),
            related_name: volume.to_owned(),
            related_namespace: None,
            description: format!(
                "PersistentVolume {} is bound to {} {} and may be released by this deletion",
                volume, target_id.kind, target_id.name
            ),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::classify_dependencies;
    use crate::finding::{RelationKind, Severity};
    use serde_json::{json, Value};

    fn config_map(name: &str) -> Value {
        json!({
            "kind": "ConfigMap",
            "metadata": { "name": name, "namespace": "default" },
            "data": { "key": "value" },
        })
    }

    fn pod_mounting_config_map(pod: &str, cm: &str) -> Value {
        json!({
            "kind": "Pod",
            "metadata": { "name": pod, "namespace": "default" },
            "spec": {
                "volumes": [{ "name": "cfg", "configMap": { "name": cm } }],
                "containers": [{ "name": "main" }],
            },
        })
    }

    #[test]
    fn config_map_volume_mount_is_an_error() {
        let target = config_map("app-config");
        let candidates = vec![pod_mounting_config_map("nginx-pod", "app-config")];
        let findings = classify_dependencies("configmap", &target, &candidates);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].relation, RelationKind::Mount);
        assert_eq!(findings[0].related_kind, "Pod");
        assert_eq!(findings[0].related_name, "nginx-pod");
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn config_map_env_reference_is_an_error() {
        let target = config_map("app-config");
        let candidates = vec![json!({
            "kind": "Pod",
            "metadata": { "name": "worker", "namespace": "default" },
            "spec": {
                "containers": [{
                    "name": "main",
                    "envFrom": [{ "configMapRef": { "name": "app-config" } }],
                }],
            },
        })];
        let findings = classify_dependencies("configmap", &target, &candidates);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].related_name, "worker");
    }

    #[test]
    fn workload_template_mount_is_detected() {
        let target = json!({
            "kind": "Secret",
            "metadata": { "name": "db-creds", "namespace": "default" },
        });
        let candidates = vec![json!({
            "kind": "Deployment",
            "metadata": { "name": "app", "namespace": "default" },
            "spec": {
                "template": {
                    "spec": {
                        "volumes": [{ "name": "creds", "secret": { "secretName": "db-creds" } }],
                    },
                },
            },
        })];
        let findings = classify_dependencies("secret", &target, &candidates);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].related_kind, "Deployment");
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn bound_claim_yields_volume_release_warning() {
        let target = json!({
            "kind": "PersistentVolumeClaim",
            "metadata": { "name": "data-pvc", "namespace": "default" },
            "spec": { "volumeName": "pv-001" },
            "status": { "phase": "Bound" },
        });
        let findings = classify_dependencies("persistentvolumeclaim", &target, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].relation, RelationKind::Reference);
        assert_eq!(findings[0].related_kind, "PersistentVolume");
        assert_eq!(findings[0].related_name, "pv-001");
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn unbound_claim_yields_nothing() {
        let target = json!({
            "kind": "PersistentVolumeClaim",
            "metadata": { "name": "data-pvc", "namespace": "default" },
            "status": { "phase": "Pending" },
        });
        assert!(classify_dependencies("persistentvolumeclaim", &target, &[]).is_empty());
    }

    #[test]
    fn claim_findings_are_grouped_errors_first() {
        let target = json!({
            "kind": "PersistentVolumeClaim",
            "metadata": { "name": "data-pvc", "namespace": "default" },
            "spec": { "volumeName": "pv-001" },
            "status": { "phase": "Bound" },
        });
        let candidates = vec![json!({
            "kind": "Pod",
            "metadata": { "name": "db-0", "namespace": "default" },
            "spec": {
                "volumes": [{ "name": "data", "persistentVolumeClaim": { "claimName": "data-pvc" } }],
            },
        })];
        let findings = classify_dependencies("persistentvolumeclaim", &target, &candidates);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].related_name, "db-0");
        assert_eq!(findings[1].severity, Severity::Warning);
    }

    #[test]
    fn unmodeled_kind_yields_nothing() {
        let target = json!({
            "kind": "Service",
            "metadata": { "name": "web", "namespace": "default" },
        });
        let candidates = vec![pod_mounting_config_map("nginx-pod", "web")];
        assert!(classify_dependencies("service", &target, &candidates).is_empty());
    }

    #[test]
    fn candidate_without_relevant_fields_yields_nothing() {
        let target = config_map("app-config");
        let candidates = vec![
            json!({ "kind": "Pod", "metadata": { "name": "bare", "namespace": "default" } }),
            json!({ "kind": "Pod", "metadata": { "name": "broken" }, "spec": { "volumes": "oops" } }),
        ];
        assert!(classify_dependencies("configmap", &target, &candidates).is_empty());
    }

    #[test]
    fn target_among_candidates_is_ignored() {
        let target = config_map("app-config");
        let candidates = vec![target.clone()];
        assert!(classify_dependencies("configmap", &target, &candidates).is_empty());
    }

    #[test]
    fn zero_candidates_zero_findings() {
        let target = config_map("app-config");
        assert!(classify_dependencies("configmap", &target, &[]).is_empty());
    }

    #[test]
    fn identical_inputs_identical_output() {
        let target = config_map("app-config");
        let candidates = vec![
            pod_mounting_config_map("a", "app-config"),
            pod_mounting_config_map("b", "app-config"),
        ];
        let first = classify_dependencies("configmap", &target, &candidates);
        let second = classify_dependencies("configmap", &target, &candidates);
        assert_eq!(first, second);
        assert_eq!(first[0].related_name, "a");
        assert_eq!(first[1].related_name, "b");
    }
}
