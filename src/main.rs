//! podgraph - query a Kubernetes resource graph and attribute node cost to pods

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use podgraph::cli::{
    ConfigSubcommand, GraphCommand, display_version, handle_config_command,
    handle_graph_command, init_logging,
};
use podgraph::config::ConfigLoader;

/// podgraph - query a Kubernetes resource graph and attribute node cost to pods
#[derive(Parser, Debug)]
#[command(name = "podgraph")]
#[command(about = "Query a Kubernetes resource graph and attribute node cost to pods", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Dgraph HTTP endpoint (overrides config and PODGRAPH_DGRAPH_URL)
    #[arg(long, global = true)]
    dgraph_url: Option<String>,

    /// Kubeconfig context to use for the cost report
    #[arg(long, global = true)]
    context: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Graph(GraphCommand),
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match args.command {
        Command::Config { subcommand } => handle_config_command(subcommand),
        Command::Version => {
            display_version();
            Ok(())
        }
        Command::Graph(command) => {
            let mut config = ConfigLoader::load().context("Failed to load configuration")?;
            if let Some(url) = args.dgraph_url {
                config.dgraph.url = url;
            }
            if let Some(context) = args.context {
                config.kube.context = Some(context);
            }
            ConfigLoader::check(&config)?;

            tracing::debug!(
                "Using Dgraph at {} (timeout {}s)",
                config.dgraph.url,
                config.dgraph.timeout_secs
            );

            handle_graph_command(command, &config).await
        }
    }
}
