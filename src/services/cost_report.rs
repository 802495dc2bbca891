//! Cost report over the pods matching a label selector

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cost::{CostInputs, aggregate};
use crate::kube::{PodDescriptor, PodLister};
use crate::models::Cost;
use crate::services::PodQueryService;

/// Cost of one pod with what it was attributed from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodCost {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    pub node_cost_percentage: f64,
    pub pvcs: Vec<String>,
    pub cost: Cost,
}

/// Per-pod costs and their sum
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostReport {
    pub pods: Vec<PodCost>,
    pub total: Cost,
}

/// Joins the orchestrator's pod list with graph-held cost inputs
pub struct CostReportService {
    lister: Arc<dyn PodLister>,
    queries: PodQueryService,
}

impl CostReportService {
    pub fn new(lister: Arc<dyn PodLister>, queries: PodQueryService) -> Self {
        Self { lister, queries }
    }

    /// Cost every pod matching `selector`
    ///
    /// A failed pod listing fails the report. A pod whose cost inputs cannot
    /// be read from the graph is costed from fallback inputs instead.
    pub async fn report(&self, selector: &str) -> Result<CostReport> {
        let pods = self
            .lister
            .list_pods(selector)
            .await
            .context("Failed to list pods for cost report")?;

        tracing::debug!("Costing {} pods", pods.len());

        let mut costed = Vec::with_capacity(pods.len());
        for pod in pods {
            let inputs = self.inputs_for(&pod).await;
            costed.push(PodCost {
                node_name: pod.node_name.or(inputs.node_name.clone()),
                node_cost_percentage: inputs.node_cost_percentage,
                cost: inputs.cost(),
                name: pod.name,
                pvcs: pod.pvcs,
            });
        }

        let total = aggregate(costed.iter().map(|pod| &pod.cost));
        Ok(CostReport {
            pods: costed,
            total,
        })
    }

    async fn inputs_for(&self, pod: &PodDescriptor) -> CostInputs {
        let fallback = || CostInputs::fallback(self.queries.fallback_prices());
        match self.queries.retrieve_cost_inputs(&pod.name).await {
            Ok(Some(inputs)) => inputs,
            Ok(None) => {
                tracing::warn!("Pod '{}' not found in graph, using fallback inputs", pod.name);
                fallback()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read cost inputs for '{}', using fallback inputs: {}",
                    pod.name,
                    e
                );
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::UnitPrices;
    use crate::error::StoreError;
    use crate::kube::pods::MockPodLister;
    use crate::store::MockGraphStore;

    fn descriptor(name: &str, node: Option<&str>) -> PodDescriptor {
        PodDescriptor {
            name: name.to_string(),
            node_name: node.map(str::to_string),
            pvcs: Vec::new(),
        }
    }

    fn service(lister: MockPodLister, store: MockGraphStore) -> CostReportService {
        CostReportService::new(
            Arc::new(lister),
            PodQueryService::new(Arc::new(store), UnitPrices::default()),
        )
    }

    #[tokio::test]
    async fn test_report_sums_pod_costs() {
        let mut lister = MockPodLister::new();
        lister
            .expect_list_pods()
            .withf(|selector: &str| selector == "app=web")
            .times(1)
            .returning(|_| Ok(vec![descriptor("web-1", None), descriptor("web-2", None)]));

        let mut store = MockGraphStore::new();
        store.expect_execute_raw().times(2).returning(|query| {
            let reply = if query.contains(r#""web-1""#) {
                r#"{"pod": [{"name": "web-1", "cpuPrice": 1.0, "memoryPrice": 1.0,
                    "nodeCostPercentage": 0.5,
                    "node": [{"name": "node-a", "cpuCapacity": 2, "memoryCapacity": 4}]}]}"#
            } else {
                r#"{"pod": [{"name": "web-2", "cpuPrice": 1.0, "memoryPrice": 1.0,
                    "nodeCostPercentage": 0.25,
                    "node": [{"name": "node-b", "cpuCapacity": 4, "memoryCapacity": 8}]}]}"#
            };
            Ok(reply.as_bytes().to_vec())
        });

        let report = service(lister, store).report("app=web").await.unwrap();
        assert_eq!(report.pods.len(), 2);
        assert_eq!(report.pods[0].node_name.as_deref(), Some("node-a"));
        assert_eq!(report.pods[0].cost.cpu(), 1.0);
        assert_eq!(report.pods[0].cost.memory(), 2.0);
        assert_eq!(report.pods[1].cost.cpu(), 1.0);
        assert_eq!(report.pods[1].cost.memory(), 2.0);
        assert_eq!(report.total.total(), 6.0);
    }

    #[tokio::test]
    async fn test_orchestrator_node_name_wins() {
        let mut lister = MockPodLister::new();
        lister
            .expect_list_pods()
            .returning(|_| Ok(vec![descriptor("web-1", Some("node-live"))]));

        let mut store = MockGraphStore::new();
        store.expect_execute_raw().returning(|_| {
            Ok(br#"{"pod": [{"name": "web-1", "node": [{"name": "node-stale"}]}]}"#.to_vec())
        });

        let report = service(lister, store).report("").await.unwrap();
        assert_eq!(report.pods[0].node_name.as_deref(), Some("node-live"));
    }

    #[tokio::test]
    async fn test_unreadable_inputs_fall_back() {
        let mut lister = MockPodLister::new();
        lister
            .expect_list_pods()
            .returning(|_| Ok(vec![descriptor("web-1", Some("node-a"))]));

        let mut store = MockGraphStore::new();
        store
            .expect_execute_raw()
            .returning(|_| Err(StoreError::Unavailable("refused".to_string())));

        let report = service(lister, store).report("app=web").await.unwrap();
        assert_eq!(report.pods.len(), 1);
        assert_eq!(report.pods[0].node_cost_percentage, 0.0);
        assert_eq!(report.pods[0].cost, Cost::default());
        assert_eq!(report.total, Cost::default());
    }

    #[tokio::test]
    async fn test_listing_failure_fails_report() {
        let mut lister = MockPodLister::new();
        lister
            .expect_list_pods()
            .returning(|_| Err(anyhow::anyhow!("forbidden")));

        let store = MockGraphStore::new();
        assert!(service(lister, store).report("app=web").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_listing_is_empty_report() {
        let mut lister = MockPodLister::new();
        lister.expect_list_pods().returning(|_| Ok(Vec::new()));

        let report = service(lister, MockGraphStore::new())
            .report("app=none")
            .await
            .unwrap();
        assert!(report.pods.is_empty());
        assert_eq!(report.total, Cost::default());
    }
}
