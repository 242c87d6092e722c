//! Cluster-backed implementation of the [`RelatedLister`] collaborator.

use crate::error::Result;
use crate::workflow::RelatedLister;
use futures::future::BoxFuture;
use http::Request;
use inflector::Inflector;
use kube::api::DeleteParams;
use kube::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Runtime metadata for one served resource kind
#[derive(Clone, Debug)]
struct KindMeta {
    // "v1" or "apps/v1"
    group_version: String,
    plural: String,
    namespaced: bool,
}

#[derive(Deserialize)]
struct ObjectList {
    items: Vec<Value>,
}

/// Which kinds can plausibly depend on or be owned by the target kind.
/// Listing is advisory, so an overly narrow set costs findings, not safety.
fn candidate_kinds(target_kind_tag: &str) -> &'static [&'static str] {
    match target_kind_tag {
        "configmap" | "secret" => &["Pod", "Deployment", "StatefulSet", "DaemonSet"],
        "persistentvolumeclaim" => &["Pod"],
        "deployment" => &["ReplicaSet", "Pod"],
        "replicaset" | "statefulset" | "daemonset" | "job" => &["Pod"],
        "cronjob" => &["Job", "Pod"],
        _ => &[],
    }
}

/// Lists, fetches and deletes unstructured objects through the cluster API,
/// resolving plural names and scoping via API discovery
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
    kinds: BTreeMap<String, KindMeta>,
}

impl KubeLister {
    /// Walk `/api` and `/apis` once and remember every served kind
    pub async fn discover(client: Client) -> Result<Self> {
        let mut kinds = BTreeMap::new();

        for version in client.list_core_api_versions().await?.versions {
            for resource in client.list_core_api_resources(&version).await?.resources {
                if resource.name.contains('/') {
                    continue;
                }
                kinds
                    .entry(resource.kind.to_ascii_lowercase())
                    .or_insert_with(|| KindMeta {
                        group_version: version.clone(),
                        plural: resource.name.clone(),
                        namespaced: resource.namespaced,
                    });
            }
        }

        for group in client.list_api_groups().await?.groups {
            let version = match group
                .preferred_version
                .as_ref()
                .or_else(|| group.versions.last())
            {
                Some(v) => v,
                None => continue,
            };
            for resource in client
                .list_api_group_resources(&version.group_version)
                .await?
                .resources
            {
                if resource.name.contains('/') {
                    continue;
                }
                kinds
                    .entry(resource.kind.to_ascii_lowercase())
                    .or_insert_with(|| KindMeta {
                        group_version: version.group_version.clone(),
                        plural: resource.name.clone(),
                        namespaced: resource.namespaced,
                    });
            }
        }

        Ok(Self { client, kinds })
    }

    fn meta_for(&self, kind: &str) -> KindMeta {
        let tag = kind.to_ascii_lowercase();
        match self.kinds.get(&tag) {
            Some(meta) => meta.clone(),
            None => {
                log::warn!("kind {} not found in API discovery, guessing its URL", kind);
                KindMeta {
                    group_version: "v1".to_owned(),
                    plural: tag.to_plural(),
                    namespaced: true,
                }
            }
        }
    }

    fn collection_url(&self, meta: &KindMeta, namespace: Option<&str>) -> String {
        let prefix = if meta.group_version.contains('/') {
            "apis"
        } else {
            "api"
        };
        let ns_prefix = if meta.namespaced {
            format!("namespaces/{}/", namespace.unwrap_or("default"))
        } else {
            String::new()
        };
        format!(
            "/{}/{}/{}{}",
            prefix, meta.group_version, ns_prefix, meta.plural
        )
    }

    async fn list_kind(&self, kind: &str, namespace: Option<&str>) -> anyhow::Result<Vec<Value>> {
        let meta = self.meta_for(kind);
        let url = self.collection_url(&meta, namespace);
        let req = Request::get(&url)
            .header("Accept", "application/json")
            .body(vec![])
            .map_err(kube::Error::HttpError)?;
        let list: ObjectList = self.client.request(req).await?;

        let mut items = list.items;
        for item in items.iter_mut() {
            // list items do not carry their kind; put it back for analysis
            if let Some(obj) = item.as_object_mut() {
                if !obj.contains_key("kind") {
                    obj.insert("kind".to_owned(), Value::String(kind.to_owned()));
                }
            }
        }
        Ok(items)
    }

    pub async fn get_object(
        &self,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Value> {
        let meta = self.meta_for(kind);
        let url = format!("{}/{}", self.collection_url(&meta, namespace), name);
        let req = Request::get(&url)
            .header("Accept", "application/json")
            .body(vec![])
            .map_err(kube::Error::HttpError)?;
        Ok(self.client.request(req).await?)
    }

    pub async fn delete_object(
        &self,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<()> {
        let meta = self.meta_for(kind);
        let url = format!("{}/{}", self.collection_url(&meta, namespace), name);
        let body = serde_json::to_vec(&DeleteParams::default())?;
        let req = Request::delete(&url)
            .header("Accept", "application/json")
            .body(body)
            .map_err(kube::Error::HttpError)?;
        let _result: Value = self.client.request(req).await?;
        Ok(())
    }
}

impl RelatedLister for KubeLister {
    fn list_related(
        &self,
        kind: &str,
        namespace: Option<&str>,
    ) -> BoxFuture<'_, anyhow::Result<Vec<Value>>> {
        let tag = kind.to_ascii_lowercase();
        let namespace = namespace.map(str::to_owned);
        Box::pin(async move {
            let mut out = Vec::new();
            for candidate_kind in candidate_kinds(&tag) {
                match self.list_kind(candidate_kind, namespace.as_deref()).await {
                    Ok(mut items) => out.append(&mut items),
                    // partial data beats none; absence reads as "no dependency"
                    Err(e) => log::warn!("listing {} failed: {}", candidate_kind, e),
                }
            }
            Ok(out)
        })
    }
}
