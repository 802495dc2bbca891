//! Graph and cost subcommand handlers

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::Config;
use crate::constants::ALL;
use crate::error::QueryError;
use crate::kube::{self, KubePodLister, parse_label_selector};
use crate::models::ResourceKind;
use crate::query::LabelSet;
use crate::services::{CostReport, CostReportService, PodQueryService};
use crate::store::DgraphStore;

/// Queries against the resource graph
#[derive(Subcommand, Debug)]
pub enum GraphCommand {
    /// List pods that have not terminated
    Live,
    /// Show inbound and outbound pod interactions
    Interactions {
        /// Pod name; all pods when omitted
        #[arg(default_value = ALL)]
        name: String,
        /// Include pods without outbound interactions
        #[arg(long)]
        orphan: bool,
        /// Also report edge counts and selecting services
        #[arg(long, conflicts_with_all = ["name", "orphan"])]
        counts: bool,
    },
    /// Show a resource and the resources it contains
    Hierarchy {
        /// Resource name
        name: String,
        /// Kind of the root resource (pod or service)
        #[arg(long, short = 'k', default_value = "pod", value_parser = parse_kind)]
        kind: ResourceKind,
    },
    /// Show resource requests and their cost for a pod and its containers
    Metrics {
        /// Pod name
        name: String,
    },
    /// Show the unit prices applied to a pod
    Prices {
        /// Pod name
        name: String,
    },
    /// List uids of pods matching every given label
    ByLabel {
        /// Label as key=value; repeat a key to accept several values
        #[arg(long = "label", short = 'l', required = true)]
        labels: Vec<String>,
    },
    /// Attribute node cost to the pods matching a selector
    Cost {
        /// Label selector (key=value[,key=value]); all pods when omitted
        #[arg(long, short = 'l', default_value = "")]
        selector: String,
        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

/// Cost report rendering
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_kind(value: &str) -> Result<ResourceKind, String> {
    ResourceKind::from_str_case_insensitive(value)
        .ok_or_else(|| format!("Unknown resource kind: {}", value))
}

/// Handle graph subcommands
pub async fn handle_graph_command(cmd: GraphCommand, config: &Config) -> Result<()> {
    let queries = query_service(config)?;

    match cmd {
        GraphCommand::Live => {
            print_json(&queries.retrieve_all_live_pods().await)?;
        }
        GraphCommand::Interactions {
            name,
            orphan,
            counts,
        } => {
            if counts {
                let pods = queries
                    .retrieve_pods_interactions_with_count()
                    .await
                    .context("Failed to retrieve pod interactions")?;
                print_json(&pods)?;
            } else {
                let raw = queries.retrieve_pods_interactions(&name, orphan).await;
                println!("{}", String::from_utf8_lossy(&raw));
            }
        }
        GraphCommand::Hierarchy { name, kind } => {
            print_json(&queries.retrieve_hierarchy(kind, &name).await)?;
        }
        GraphCommand::Metrics { name } => {
            print_json(&queries.retrieve_pod_metrics(&name).await)?;
        }
        GraphCommand::Prices { name } => {
            print_json(&queries.price_per_resource(&name).await)?;
        }
        GraphCommand::ByLabel { labels } => {
            let labels = label_set(&labels)?;
            let uids = queries
                .retrieve_pod_uids_by_labels(&labels)
                .await
                .context("Failed to retrieve pods by label")?;
            print_json(&uids)?;
        }
        GraphCommand::Cost { selector, output } => {
            // Reject malformed selectors before reaching the API server
            parse_label_selector(&selector)?;

            let client = kube::create_client(config.kube.context.as_deref()).await?;
            let service = CostReportService::new(Arc::new(KubePodLister::new(client)), queries);
            let report = service.report(&selector).await?;

            match output {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print!("{}", render_report(&report)),
            }
        }
    }

    Ok(())
}

fn query_service(config: &Config) -> Result<PodQueryService> {
    let store = DgraphStore::new(
        &config.dgraph.url,
        Duration::from_secs(config.dgraph.timeout_secs),
        config.dgraph.best_effort,
    )
    .context("Failed to create graph store")?;

    Ok(PodQueryService::new(
        Arc::new(store),
        config.pricing.unit_prices(),
    ))
}

/// Merge repeated `key=value` arguments into one label mapping
pub fn label_set(args: &[String]) -> Result<LabelSet, QueryError> {
    let mut labels = LabelSet::new();
    for arg in args {
        let parsed = parse_label_selector(arg)?;
        if parsed.is_empty() {
            return Err(QueryError::InvalidSelector(arg.clone()));
        }
        for (key, value) in parsed {
            labels.entry(key).or_default().insert(value);
        }
    }
    Ok(labels)
}

/// Render a cost report as a fixed-width table
pub fn render_report(report: &CostReport) -> String {
    let mut out = format!(
        "{:<40} {:<24} {:>8} {:>12} {:>12} {:>12} {:>12}\n",
        "POD", "NODE", "SHARE", "CPU", "MEMORY", "STORAGE", "TOTAL"
    );

    for pod in &report.pods {
        out.push_str(&format!(
            "{:<40} {:<24} {:>8.4} {:>12.6} {:>12.6} {:>12.6} {:>12.6}\n",
            pod.name,
            pod.node_name.as_deref().unwrap_or("-"),
            pod.node_cost_percentage,
            pod.cost.cpu(),
            pod.cost.memory(),
            pod.cost.storage(),
            pod.cost.total(),
        ));
        if !pod.pvcs.is_empty() {
            out.push_str(&format!("  pvcs: {}\n", pod.pvcs.join(", ")));
        }
    }

    out.push_str(&format!(
        "{:<40} {:<24} {:>8} {:>12.6} {:>12.6} {:>12.6} {:>12.6}\n",
        "TOTAL",
        "",
        "",
        report.total.cpu(),
        report.total.memory(),
        report.total.storage(),
        report.total.total(),
    ));
    out
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
