//! Pod query service
//!
//! Every graph question the crate answers goes through here: build the query,
//! run it against the store, decode and deduplicate the reply. Listing and
//! passthrough calls degrade to an empty result and log the failure; calls
//! whose result feeds further computation return the error instead.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cost::{CostInputs, UnitPrices};
use crate::error::QueryResult;
use crate::models::{Pod, ResourceKind};
use crate::query::{
    CostInputsRoot, LabelFilter, LabelSet, PodsRoot, PriceRoot, QueryIntent, decode_payload,
    require_named, unique_ids,
};
use crate::store::{GraphStore, execute_query};

/// Graph operations over pods and their related resources
#[derive(Clone)]
pub struct PodQueryService {
    store: Arc<dyn GraphStore>,
    fallback_prices: UnitPrices,
}

impl PodQueryService {
    pub fn new(store: Arc<dyn GraphStore>, fallback_prices: UnitPrices) -> Self {
        Self {
            store,
            fallback_prices,
        }
    }

    /// Prices used wherever the graph stores none
    pub fn fallback_prices(&self) -> &UnitPrices {
        &self.fallback_prices
    }

    /// Every pod that has not terminated
    pub async fn retrieve_all_live_pods(&self) -> Vec<Pod> {
        match self.query::<PodsRoot>(QueryIntent::AllLive).await {
            Ok(root) => root.pods,
            Err(e) => {
                tracing::error!("Failed to retrieve live pods: {}", e);
                Vec::new()
            }
        }
    }

    /// Interactions of one pod, or of every pod when `name` is `ALL`
    ///
    /// With `ALL`, `orphan` also includes pods that have no outbound edge.
    /// The reply is returned as the store produced it.
    pub async fn retrieve_pods_interactions(&self, name: &str, orphan: bool) -> Vec<u8> {
        let query = match (QueryIntent::InteractionsFor { name, orphan }).build() {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Failed to build interactions query for '{}': {}", name, e);
                return Vec::new();
            }
        };

        match self.store.execute_raw(&query).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to retrieve interactions for '{}': {}", name, e);
                Vec::new()
            }
        }
    }

    /// Live pods with their outbound edge counts and selecting services
    pub async fn retrieve_pods_interactions_with_count(&self) -> QueryResult<Vec<Pod>> {
        let root: PodsRoot = self.query(QueryIntent::InteractionsWithCount).await?;
        Ok(root.pods)
    }

    /// A pod and its containers
    pub async fn retrieve_pod_hierarchy(&self, name: &str) -> Value {
        self.retrieve_hierarchy(ResourceKind::Pod, name).await
    }

    /// A service and the pods it selects
    pub async fn retrieve_service_hierarchy(&self, name: &str) -> Value {
        self.retrieve_hierarchy(ResourceKind::Service, name).await
    }

    /// A named resource and its structurally contained children
    ///
    /// Returns `Value::Null` when `name` is `ALL`, when `kind` has no
    /// hierarchy, or when the store call fails.
    pub async fn retrieve_hierarchy(&self, kind: ResourceKind, name: &str) -> Value {
        let query = match (QueryIntent::HierarchyFor { kind, name }).build() {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Cannot retrieve {} hierarchy: {}", kind, e);
                return Value::Null;
            }
        };

        self.passthrough(&query, "hierarchy", name).await
    }

    /// Resource requests and their cost for a pod and its containers
    ///
    /// Prices come from the pod's stored prices, falling back to the
    /// configured defaults.
    pub async fn retrieve_pod_metrics(&self, name: &str) -> Value {
        if let Err(e) = require_named(name) {
            tracing::error!("Cannot retrieve pod metrics: {}", e);
            return Value::Null;
        }

        let prices = self.price_per_resource(name).await;
        let query = match (QueryIntent::CostMetricsFor {
            name,
            prices: &prices,
        })
        .build()
        {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Failed to build metrics query for '{}': {}", name, e);
                return Value::Null;
            }
        };

        self.passthrough(&query, "metrics", name).await
    }

    /// Per-unit prices of a pod
    ///
    /// Never fails: any price the graph does not hold, or any error reaching
    /// it, yields the fallback price.
    pub async fn price_per_resource(&self, name: &str) -> UnitPrices {
        match self.query::<PriceRoot>(QueryIntent::PricesFor { name }).await {
            Ok(root) => {
                let stored = root.pod.first();
                UnitPrices::resolve(
                    stored.and_then(|p| p.cpu_price),
                    stored.and_then(|p| p.memory_price),
                    &self.fallback_prices,
                )
            }
            Err(e) => {
                tracing::warn!("Using fallback prices for '{}': {}", name, e);
                self.fallback_prices
            }
        }
    }

    /// Uids of pods carrying a matching label for every key in `labels`
    ///
    /// An empty mapping matches no pod and makes no store call.
    pub async fn retrieve_pod_uids_by_labels(&self, labels: &LabelSet) -> QueryResult<Vec<String>> {
        let filter = LabelFilter::compile(labels)?;
        if filter.matches_nothing() {
            tracing::debug!("Label filter matches nothing, skipping query");
            return Ok(Vec::new());
        }

        let root: PodsRoot = self.query(QueryIntent::UidsByLabelFilter(&filter)).await?;
        Ok(unique_ids(&root.pods))
    }

    /// Everything needed to cost one pod
    ///
    /// `Ok(None)` when the graph has no pod of that name.
    pub async fn retrieve_cost_inputs(&self, name: &str) -> QueryResult<Option<CostInputs>> {
        let root: CostInputsRoot = self.query(QueryIntent::CostInputsFor { name }).await?;
        Ok(root
            .pod
            .first()
            .map(|record| CostInputs::from_record(record, &self.fallback_prices)))
    }

    async fn query<T: DeserializeOwned>(&self, intent: QueryIntent<'_>) -> QueryResult<T> {
        let query = intent.build()?;
        execute_query(self.store.as_ref(), &query).await
    }

    async fn passthrough(&self, query: &str, what: &str, name: &str) -> Value {
        let payload = match self.store.execute_raw(query).await {
            Ok(raw) => decode_payload(&raw),
            Err(e) => Err(e.into()),
        };

        payload.unwrap_or_else(|e| {
            tracing::error!("Failed to retrieve {} for '{}': {}", what, name, e);
            Value::Null
        })
    }
}
