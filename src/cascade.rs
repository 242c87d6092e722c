use crate::finding::{DependencyFinding, RelationKind, Severity};
use resview::ObjectView;
use rustc_hash::FxHashSet;
use serde_json::Value;

/// Ownership chains in practice are shallow (Deployment -> ReplicaSet -> Pod),
/// so two expansion passes cover direct owners and owners-of-owners
pub const DEFAULT_OWNER_DEPTH: usize = 2;

/// Resources that deleting the target will remove automatically, discovered
/// by walking candidate owner references up to [`DEFAULT_OWNER_DEPTH`] levels
pub fn resolve_cascading_deletions(
    target_kind: &str,
    target_name: &str,
    target_namespace: Option<&str>,
    candidates: &[Value],
) -> Vec<DependencyFinding> {
    resolve_cascading_with_depth(
        target_kind,
        target_name,
        target_namespace,
        candidates,
        DEFAULT_OWNER_DEPTH,
    )
}

struct OwnedNode {
    kind: String,
    name: String,
    owners: Vec<(String, String)>,
}

/// Breadth-first walk over the owner-reference adjacency of `candidates`.
///
/// Each pass marks candidates owned by the target or by anything already
/// marked; `depth` bounds the number of passes and the visited set guards
/// against reference cycles. Candidates with malformed or missing owner data
/// are excluded rather than reported.
pub fn resolve_cascading_with_depth(
    target_kind: &str,
    target_name: &str,
    target_namespace: Option<&str>,
    candidates: &[Value],
    depth: usize,
) -> Vec<DependencyFinding> {
    let mut nodes = Vec::new();
    for candidate in candidates {
        let view = match ObjectView::from_value(candidate) {
            Some(v) => v,
            None => continue,
        };
        // owner references never cross namespaces
        match (view.metadata.namespace.as_deref(), target_namespace) {
            (Some(ns), Some(target_ns)) if ns != target_ns => continue,
            _ => {}
        }
        let (kind, name) = match (&view.kind, &view.metadata.name) {
            (Some(kind), Some(name)) => (kind.clone(), name.clone()),
            _ => continue,
        };
        let owners = view
            .owners()
            .map(|(k, n)| (k.to_ascii_lowercase(), n.to_owned()))
            .collect::<Vec<_>>();
        if owners.is_empty() {
            continue;
        }
        nodes.push(OwnedNode { kind, name, owners });
    }

    let mut doomed: FxHashSet<(String, String)> = FxHashSet::default();
    doomed.insert((target_kind.to_ascii_lowercase(), target_name.to_owned()));
    let mut visited: FxHashSet<usize> = FxHashSet::default();
    let mut order = Vec::new();

    for _pass in 0..depth {
        let mut discovered = Vec::new();
        for (idx, node) in nodes.iter().enumerate() {
            if visited.contains(&idx) {
                continue;
            }
            if node
                .owners
                .iter()
                .any(|owner| doomed.contains(owner))
            {
                discovered.push(idx);
            }
        }
        if discovered.is_empty() {
            break;
        }
        for idx in discovered {
            let node = &nodes[idx];
            visited.insert(idx);
            doomed.insert((node.kind.to_ascii_lowercase(), node.name.clone()));
            order.push(idx);
        }
    }

    coalesce(target_kind, target_name, target_namespace, &nodes, &order)
}

/// Several owned resources of one kind collapse into a single finding whose
/// name reads as a count, to keep confirmation output compact
fn coalesce(
    target_kind: &str,
    target_name: &str,
    target_namespace: Option<&str>,
    nodes: &[OwnedNode],
    order: &[usize],
) -> Vec<DependencyFinding> {
    let mut groups: Vec<(String, Vec<&OwnedNode>)> = Vec::new();
    for &idx in order {
        let node = &nodes[idx];
        let tag = node.kind.to_ascii_lowercase();
        match groups.iter_mut().find(|(kind, _)| *kind == tag) {
            Some((_, members)) => members.push(node),
            None => groups.push((tag, vec![node])),
        }
    }

    groups
        .into_iter()
        .map(|(_, members)| {
            let kind = members[0].kind.clone();
            let related_name = if members.len() == 1 {
                members[0].name.clone()
            } else {
                format!("{} {}(s)", members.len(), kind.to_ascii_lowercase())
            };
            let description = format!(
                "{} will be deleted together with {} {}",
                related_name, target_kind, target_name
            );
            DependencyFinding {
                relation: RelationKind::Ownership,
                related_kind: kind,
                related_name,
                related_namespace: target_namespace.map(str::to_owned),
                description,
                severity: Severity::Info,
            }
        })
        .collect()
}
