//! DQL query construction
//!
//! Each question the crate can ask of the resource graph is a `QueryIntent`.
//! `QueryIntent::build` turns it into query text. Names and label values go
//! through `escape::quote`; prices go through `cost::format_price`. Nothing
//! caller-supplied is concatenated into a query any other way.

use std::fmt;

use crate::constants::{ALL, END_TIME_PREDICATE};
use crate::cost::{UnitPrices, format_price};
use crate::error::{QueryError, QueryResult};
use crate::models::ResourceKind;
use crate::query::escape::quote;
use crate::query::labels::LabelFilter;

/// Edge traversed from a root vertex, forward or reverse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub name: &'static str,
    pub reverse: bool,
}

impl Edge {
    pub const fn forward(name: &'static str) -> Self {
        Self {
            name,
            reverse: false,
        }
    }

    pub const fn reverse(name: &'static str) -> Self {
        Self {
            name,
            reverse: true,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse {
            write!(f, "~{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Container -> pod membership, service -> pod selection, pod -> pod traffic
pub const POD_EDGE: Edge = Edge::forward("pod");
/// Resource -> label attachment
pub const LABEL_EDGE: Edge = Edge::forward("label");

/// A question to ask of the resource graph
#[derive(Debug, Clone, Copy)]
pub enum QueryIntent<'a> {
    /// Every pod without an `endTime`
    AllLive,
    /// Inbound and outbound interactions of one pod, or of all pods with `ALL`
    InteractionsFor { name: &'a str, orphan: bool },
    /// Interactions of live pods with edge counts and selecting services
    InteractionsWithCount,
    /// Root resource and its structurally contained children
    HierarchyFor { kind: ResourceKind, name: &'a str },
    /// Stored per-unit prices of one pod
    PricesFor { name: &'a str },
    /// Resource requests of one pod and its containers, costed at `prices`
    CostMetricsFor {
        name: &'a str,
        prices: &'a UnitPrices,
    },
    /// Prices, node share, host capacity and claimed storage of one pod
    CostInputsFor { name: &'a str },
    /// Uids of pods whose labels satisfy `filter`
    UidsByLabelFilter(&'a LabelFilter),
}

impl QueryIntent<'_> {
    /// Build the query text for this intent
    pub fn build(&self) -> QueryResult<String> {
        match *self {
            QueryIntent::AllLive => Ok(all_live_query()),
            QueryIntent::InteractionsFor { name, orphan } => interactions_query(name, orphan),
            QueryIntent::InteractionsWithCount => Ok(interactions_with_count_query()),
            QueryIntent::HierarchyFor { kind, name } => {
                let (edge, child) = hierarchy_shape(kind)?;
                hierarchy_query(
                    kind.tag(),
                    edge,
                    require_named(name)?,
                    &format!("@filter(has({}))", child.tag()),
                )
            }
            QueryIntent::PricesFor { name } => prices_query(require_named(name)?),
            QueryIntent::CostMetricsFor { name, prices } => {
                pod_metrics_query(require_named(name)?, prices)
            }
            QueryIntent::CostInputsFor { name } => cost_inputs_query(require_named(name)?),
            QueryIntent::UidsByLabelFilter(filter) => Ok(uids_by_label_filter_query(filter)),
        }
    }
}

/// Reject the wildcard sentinel where exactly one resource is required
pub fn require_named(name: &str) -> QueryResult<&str> {
    if name == ALL {
        return Err(QueryError::InvalidTarget(name.to_string()));
    }
    Ok(name)
}

/// Edge to children and child kind for resources that have a hierarchy
fn hierarchy_shape(kind: ResourceKind) -> QueryResult<(Edge, ResourceKind)> {
    match kind {
        ResourceKind::Pod => Ok((Edge::reverse(POD_EDGE.name), ResourceKind::Container)),
        ResourceKind::Service => Ok((POD_EDGE, ResourceKind::Pod)),
        other => Err(QueryError::UnsupportedHierarchy(other.as_str())),
    }
}

fn name_filter(name: &str) -> QueryResult<String> {
    Ok(format!("@filter(eq(name, {}))", quote(name)?))
}

fn all_live_query() -> String {
    format!(
        r#"query {{
  pods(func: has({pod})) @filter(NOT has({end_time})) {{
    uid
    xid
    name
  }}
}}"#,
        pod = ResourceKind::Pod.tag(),
        end_time = END_TIME_PREDICATE,
    )
}

fn interactions_query(name: &str, orphan: bool) -> QueryResult<String> {
    let filter = if name == ALL {
        if orphan {
            String::new()
        } else {
            format!(" @filter(has({}))", POD_EDGE)
        }
    } else {
        format!(" {}", name_filter(name)?)
    };

    Ok(format!(
        r#"query {{
  pods(func: has({pod})){filter} {{
    name
    outbound: {edge} {{
      name
    }}
    inbound: ~{edge} @filter(has({pod})) {{
      name
    }}
  }}
}}"#,
        pod = ResourceKind::Pod.tag(),
        edge = POD_EDGE.name,
    ))
}

fn interactions_with_count_query() -> String {
    format!(
        r#"query {{
  pods(func: has({pod})) @filter(NOT has({end_time})) {{
    name
    {edge} {{
      name
      count
    }}
    cid: ~{edge} @filter(has({service})) {{
      name
    }}
  }}
}}"#,
        pod = ResourceKind::Pod.tag(),
        service = ResourceKind::Service.tag(),
        end_time = END_TIME_PREDICATE,
        edge = POD_EDGE.name,
    )
}

/// Two-level traversal from one named root to its children
///
/// Shared by every resource hierarchy: `root_tag` selects the root kind,
/// `edge` leads to the children and `child_filter` restricts them.
pub fn hierarchy_query(
    root_tag: &str,
    edge: Edge,
    root_name: &str,
    child_filter: &str,
) -> QueryResult<String> {
    Ok(format!(
        r#"query {{
  parent(func: has({root_tag})) {filter} {{
    name
    children: {edge} {child_filter} {{
      name
    }}
  }}
}}"#,
        filter = name_filter(root_name)?,
    ))
}

fn prices_query(name: &str) -> QueryResult<String> {
    Ok(format!(
        r#"query {{
  pod(func: has({pod})) {filter} {{
    cpuPrice
    memoryPrice
  }}
}}"#,
        pod = ResourceKind::Pod.tag(),
        filter = name_filter(name)?,
    ))
}

/// Resource requests of a pod and its containers with their cost at `prices`
///
/// Prices are injected as fixed-point literals so repeated calls with the
/// same prices produce identical query text.
pub fn pod_metrics_query(name: &str, prices: &UnitPrices) -> QueryResult<String> {
    let prices = prices.sanitized();
    Ok(format!(
        r#"query {{
  parent(func: has({pod})) {filter} {{
    name
    podCpu as cpuRequest
    podMemory as memoryRequest
    podStorage as storageRequest
    cpuCost: math(podCpu * {cpu})
    memoryCost: math(podMemory * {memory})
    storageCost: math(podStorage * {storage})
    children: ~{edge} @filter(has({container})) {{
      name
      containerCpu as cpuRequest
      containerMemory as memoryRequest
      containerStorage as storageRequest
      cpuCost: math(containerCpu * {cpu})
      memoryCost: math(containerMemory * {memory})
      storageCost: math(containerStorage * {storage})
    }}
  }}
}}"#,
        pod = ResourceKind::Pod.tag(),
        container = ResourceKind::Container.tag(),
        edge = POD_EDGE.name,
        filter = name_filter(name)?,
        cpu = format_price(prices.cpu),
        memory = format_price(prices.memory),
        storage = format_price(prices.storage),
    ))
}

fn cost_inputs_query(name: &str) -> QueryResult<String> {
    Ok(format!(
        r#"query {{
  pod(func: has({pod})) {filter} {{
    name
    cpuPrice
    memoryPrice
    nodeCostPercentage
    node {{
      name
      cpuCapacity
      memoryCapacity
    }}
    pvc {{
      name
      storageCapacity
    }}
  }}
}}"#,
        pod = ResourceKind::Pod.tag(),
        filter = name_filter(name)?,
    ))
}

/// Pods reachable from label vertices matching `filter`
///
/// Each per-key clause binds its own uid variable; the final block intersects
/// them, so a pod must carry a matching label for every key.
fn uids_by_label_filter_query(filter: &LabelFilter) -> String {
    let clauses = if filter.matches_nothing() {
        vec![filter.to_string()]
    } else {
        filter.clauses().to_vec()
    };

    let mut query = String::from("query {\n");
    for (index, clause) in clauses.iter().enumerate() {
        query.push_str(&format!(
            r#"  var(func: has({label})) @filter({clause}) {{
    labelled{index} as ~{edge} @filter(has({pod})) {{
      uid
    }}
  }}
"#,
            label = ResourceKind::Label.tag(),
            edge = LABEL_EDGE.name,
            pod = ResourceKind::Pod.tag(),
        ));
    }

    let intersection = if clauses.len() > 1 {
        let others = (1..clauses.len())
            .map(|index| format!("uid(labelled{})", index))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!(" @filter({})", others)
    } else {
        String::new()
    };

    query.push_str(&format!(
        r#"  pods(func: uid(labelled0)){intersection} {{
    uid
    name
  }}
}}"#
    ));
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::labels::LabelSet;

    #[test]
    fn test_all_live_filters_on_end_time_absence() {
        let query = QueryIntent::AllLive.build().unwrap();
        assert!(query.contains("pods(func: has(isPod)) @filter(NOT has(endTime))"));
        assert!(query.contains("uid") && query.contains("xid"));
    }

    #[test]
    fn test_orphan_queries_differ_only_by_has_pod_filter() {
        let orphan = QueryIntent::InteractionsFor {
            name: ALL,
            orphan: true,
        }
        .build()
        .unwrap();
        let attached = QueryIntent::InteractionsFor {
            name: ALL,
            orphan: false,
        }
        .build()
        .unwrap();

        assert!(orphan.contains("pods(func: has(isPod)) {"));
        assert!(attached.contains("pods(func: has(isPod)) @filter(has(pod)) {"));
        assert_eq!(attached.replacen(" @filter(has(pod))", "", 1), orphan);
    }

    #[test]
    fn test_named_interactions_filter_by_escaped_name() {
        let query = QueryIntent::InteractionsFor {
            name: r#"web"1"#,
            orphan: false,
        }
        .build()
        .unwrap();
        assert!(query.contains(r#"pods(func: has(isPod)) @filter(eq(name, "web\"1")) {"#));
        assert!(query.contains("outbound: pod {"));
        assert!(query.contains("inbound: ~pod @filter(has(isPod)) {"));
    }

    #[test]
    fn test_hierarchy_requires_named_target() {
        let result = QueryIntent::HierarchyFor {
            kind: ResourceKind::Pod,
            name: ALL,
        }
        .build();
        assert!(matches!(result, Err(QueryError::InvalidTarget(_))));
    }

    #[test]
    fn test_pod_hierarchy_walks_reverse_pod_edge_to_containers() {
        let query = QueryIntent::HierarchyFor {
            kind: ResourceKind::Pod,
            name: "web-1",
        }
        .build()
        .unwrap();
        assert!(query.contains(r#"parent(func: has(isPod)) @filter(eq(name, "web-1")) {"#));
        assert!(query.contains("children: ~pod @filter(has(isContainer)) {"));
    }

    #[test]
    fn test_service_hierarchy_walks_forward_pod_edge_to_pods() {
        let query = QueryIntent::HierarchyFor {
            kind: ResourceKind::Service,
            name: "web-svc",
        }
        .build()
        .unwrap();
        assert!(query.contains("parent(func: has(isService))"));
        assert!(query.contains("children: pod @filter(has(isPod)) {"));
    }

    #[test]
    fn test_hierarchy_unsupported_kind() {
        let result = QueryIntent::HierarchyFor {
            kind: ResourceKind::Label,
            name: "app",
        }
        .build();
        assert!(matches!(result, Err(QueryError::UnsupportedHierarchy(_))));
    }

    #[test]
    fn test_metrics_embed_default_prices_with_eleven_digits() {
        let prices = UnitPrices::default();
        let query = QueryIntent::CostMetricsFor {
            name: "web-1",
            prices: &prices,
        }
        .build()
        .unwrap();
        assert!(query.contains("math(podCpu * 0.02400000000)"));
        assert!(query.contains("math(podMemory * 0.01000000000)"));
        assert!(query.contains("math(containerStorage * 0.00013888888)"));
    }

    #[test]
    fn test_metrics_never_inject_non_finite_prices() {
        let prices = UnitPrices {
            cpu: f64::INFINITY,
            memory: -3.0,
            storage: f64::NAN,
        };
        let query = pod_metrics_query("web-1", &prices).unwrap();
        assert!(!query.contains("inf") && !query.contains("NaN") && !query.contains("-3"));
        assert!(query.contains("math(podCpu * 0.02400000000)"));
    }

    #[test]
    fn test_metrics_stored_negative_zero_price() {
        let prices = UnitPrices::resolve(Some(-0.0), None, &UnitPrices::default());
        let query = pod_metrics_query("web-1", &prices).unwrap();
        assert!(!query.contains("-0.0"));
        assert!(query.contains("math(podCpu * 0.00000000000)"));
    }

    #[test]
    fn test_metrics_reject_wildcard() {
        let prices = UnitPrices::default();
        let result = QueryIntent::CostMetricsFor {
            name: ALL,
            prices: &prices,
        }
        .build();
        assert!(matches!(result, Err(QueryError::InvalidTarget(_))));
    }

    #[test]
    fn test_uids_single_key_has_no_intersection() {
        let mut labels = LabelSet::new();
        labels
            .entry("app".to_string())
            .or_default()
            .insert("web".to_string());
        let filter = LabelFilter::compile(&labels).unwrap();
        let query = QueryIntent::UidsByLabelFilter(&filter).build().unwrap();
        assert!(query.contains(
            r#"var(func: has(isLabel)) @filter((eq(key, "app") AND eq(value, "web"))) {"#
        ));
        assert!(query.contains("labelled0 as ~label @filter(has(isPod)) {"));
        assert!(query.contains("pods(func: uid(labelled0)) {"));
    }

    #[test]
    fn test_uids_two_keys_intersect() {
        let mut labels = LabelSet::new();
        labels
            .entry("app".to_string())
            .or_default()
            .insert("web".to_string());
        labels
            .entry("tier".to_string())
            .or_default()
            .insert("front".to_string());
        let filter = LabelFilter::compile(&labels).unwrap();
        let query = QueryIntent::UidsByLabelFilter(&filter).build().unwrap();
        assert!(query.contains("labelled1 as ~label"));
        assert!(query.contains("pods(func: uid(labelled0)) @filter(uid(labelled1)) {"));
    }

    #[test]
    fn test_uids_match_nothing_filter() {
        let query = QueryIntent::UidsByLabelFilter(&LabelFilter::match_nothing())
            .build()
            .unwrap();
        assert!(query.contains("@filter(NOT has(isLabel))"));
    }
}
