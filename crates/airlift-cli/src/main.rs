mod commands;

use airlift_topology::TopologyConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airlift")]
#[command(version)]
#[command(about = "Build deployment plans for the Airflow-on-containers topology", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Topology overrides shared by every subcommand
#[derive(Args, Clone)]
struct BuildArgs {
    /// Bucket for shared DAG/config artifacts (random-suffixed default)
    #[arg(long)]
    bucket_name: Option<String>,

    /// Virtual network name
    #[arg(long)]
    network_name: Option<String>,

    /// Logical database name
    #[arg(long)]
    database_name: Option<String>,

    /// Cache cluster name
    #[arg(long)]
    cache_name: Option<String>,

    /// Container cluster name
    #[arg(long)]
    cluster_name: Option<String>,

    /// Fernet encryption key shared by the services
    #[arg(long, env = "AIRLIFT_FERNET_KEY", hide_env_values = true)]
    fernet_key: String,
}

impl From<BuildArgs> for TopologyConfig {
    fn from(args: BuildArgs) -> Self {
        TopologyConfig {
            bucket_name: args.bucket_name,
            network_name: args.network_name,
            database_name: args.database_name,
            cache_name: args.cache_name,
            cluster_name: args.cluster_name,
            fernet_key: Some(args.fernet_key),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the deployment plan as JSON
    Plan {
        #[command(flatten)]
        build: BuildArgs,

        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show a summary of the planned topology
    Summary {
        #[command(flatten)]
        build: BuildArgs,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan { build, output } => commands::plan::handle(build.into(), output),
        Commands::Summary { build } => commands::summary::handle(build.into()),
    }
}
