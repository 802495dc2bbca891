//! Pod listing
//!
//! The cost report needs three things per pod from the orchestrator: its
//! name, the node it is scheduled on and the claims it mounts.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use kube::api::ListParams;
use serde::Serialize;

use crate::error::{QueryError, QueryResult};

/// What the orchestrator reports about one pod
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PodDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    pub pvcs: Vec<String>,
}

/// Source of pods matching a label selector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PodLister: Send + Sync {
    /// List pods in all namespaces matching `label_selector`
    ///
    /// An empty selector matches every pod.
    async fn list_pods(&self, label_selector: &str) -> Result<Vec<PodDescriptor>>;
}

/// `PodLister` backed by the Kubernetes API
pub struct KubePodLister {
    client: kube::Client,
}

impl KubePodLister {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PodLister for KubePodLister {
    async fn list_pods(&self, label_selector: &str) -> Result<Vec<PodDescriptor>> {
        let api: Api<Pod> = Api::all(self.client.clone());
        let mut params = ListParams::default();
        if !label_selector.is_empty() {
            params = params.labels(label_selector);
        }

        tracing::debug!("Listing pods with selector '{}'", label_selector);

        let pods = api
            .list(&params)
            .await
            .with_context(|| format!("Failed to list pods with selector '{}'", label_selector))?;

        Ok(pods.items.iter().map(descriptor_from_pod).collect())
    }
}

/// Project a Kubernetes pod onto the fields the cost report uses
pub fn descriptor_from_pod(pod: &Pod) -> PodDescriptor {
    let spec = pod.spec.as_ref();
    let pvcs = spec
        .and_then(|s| s.volumes.as_ref())
        .map(|volumes| {
            volumes
                .iter()
                .filter_map(|v| v.persistent_volume_claim.as_ref())
                .map(|claim| claim.claim_name.clone())
                .collect()
        })
        .unwrap_or_default();

    PodDescriptor {
        name: pod.metadata.name.clone().unwrap_or_default(),
        node_name: spec.and_then(|s| s.node_name.clone()),
        pvcs,
    }
}

/// Parse an equality selector of the form `key=value[,key=value]`
///
/// Whitespace around keys and values is ignored. An empty selector yields an
/// empty map.
pub fn parse_label_selector(selector: &str) -> QueryResult<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    if selector.trim().is_empty() {
        return Ok(labels);
    }

    for part in selector.split(',') {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| QueryError::InvalidSelector(selector.to_string()))?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.contains('=') {
            return Err(QueryError::InvalidSelector(selector.to_string()));
        }
        labels.insert(key.to_string(), value.to_string());
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{PersistentVolumeClaimVolumeSource, PodSpec, Volume};
    use kube::api::ObjectMeta;

    #[test]
    fn test_parse_single_pair() {
        let labels = parse_label_selector("app=web").unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels["app"], "web");
    }

    #[test]
    fn test_parse_multiple_pairs_with_whitespace() {
        let labels = parse_label_selector("app = web, tier=front").unwrap();
        assert_eq!(labels["app"], "web");
        assert_eq!(labels["tier"], "front");
    }

    #[test]
    fn test_parse_empty_selector() {
        assert!(parse_label_selector("").unwrap().is_empty());
        assert!(parse_label_selector("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_selector() {
        for selector in ["app", "app=web,tier", "=web", "a=b=c", "app=web,"] {
            assert!(
                matches!(
                    parse_label_selector(selector),
                    Err(QueryError::InvalidSelector(_))
                ),
                "{} should be rejected",
                selector
            );
        }
    }

    #[test]
    fn test_parsed_keys_are_sorted() {
        let labels = parse_label_selector("tier=front,app=web").unwrap();
        let keys: Vec<&str> = labels.keys().map(String::as_str).collect();
        assert_eq!(keys, ["app", "tier"]);
    }

    #[test]
    fn test_descriptor_from_pod() {
        let claim = |name: &str| Volume {
            name: format!("{}-vol", name),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: name.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("db-0".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: Some("node-a".to_string()),
                volumes: Some(vec![
                    claim("data"),
                    Volume {
                        name: "config".to_string(),
                        ..Default::default()
                    },
                    claim("wal"),
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let descriptor = descriptor_from_pod(&pod);
        assert_eq!(descriptor.name, "db-0");
        assert_eq!(descriptor.node_name.as_deref(), Some("node-a"));
        assert_eq!(descriptor.pvcs, vec!["data".to_string(), "wal".to_string()]);
    }

    #[test]
    fn test_descriptor_from_unscheduled_pod() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("pending".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let descriptor = descriptor_from_pod(&pod);
        assert!(descriptor.node_name.is_none());
        assert!(descriptor.pvcs.is_empty());
    }
}
