//! CLI entry point for contrace.
//!
//! Runs one contact-tracing question against Neo4j (or a JSON snapshot) and
//! writes the result as JSON to stdout. Logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use contrace_core::config::{self, LogConfig, DEFAULT_ENV_PREFIX, DEFAULT_FILE_PREFIX};
use contrace_core::ContactTracer;
use contrace_graph::{GraphClient, GraphConfig};
use contrace_snapshot::{fetch, SnapshotTracer};

#[derive(Parser)]
#[command(name = "contrace")]
#[command(about = "Contact-tracing queries over a Neo4j visit graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: contrace).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX, global = true)]
    config: String,

    /// Answer from a JSON dataset snapshot instead of Neo4j.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List node labels present in the store.
    Labels,
    /// Sick people who may have spread the disease after confirmation.
    Spreaders,
    /// Healthy visits following each sick person's confirmation.
    SpreadCounts,
    /// Sick people who visited many places after confirmation.
    Careless,
    /// Sick people who avoided bars after confirmation.
    Careful,
    /// Healthy people to inform, per sick person.
    Inform,
    /// Flag exposed healthy people as high risk.
    SetHighRisk,
    /// Healthy people within reach of a person through shared places.
    Companions {
        /// Person name.
        #[arg(long)]
        name: String,
    },
    /// Place type most visited by sick people before confirmation.
    TopSickSite,
    /// Keep only the sick people among the given names.
    SickFrom {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Load a JSON dataset into Neo4j.
    Load {
        #[arg(long)]
        file: PathBuf,
        /// Delete existing persons, places and visits first.
        #[arg(long)]
        clear: bool,
    },
    /// Export the Neo4j graph to a JSON dataset.
    Export {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    check_snapshot_usage(&cli)?;

    let log_config: LogConfig = config::load_section(&cli.config, DEFAULT_ENV_PREFIX, "log")?;
    init_logging(&log_config);

    match cli.command {
        Command::Load { ref file, clear } => {
            let graph = connect(&cli.config).await?;
            let dataset = fetch::read_dataset(file).await?;
            if clear {
                graph.clear().await?;
            }
            graph.load_dataset(&dataset).await?;
            tracing::info!(
                persons = dataset.persons.len(),
                places = dataset.places.len(),
                visits = dataset.visits.len(),
                "Dataset loaded"
            );
        }
        Command::Export { ref file } => {
            let graph = connect(&cli.config).await?;
            let dataset = graph.export_dataset().await?;
            fetch::write_dataset(file, &dataset).await?;
            tracing::info!(path = %file.display(), "Dataset exported");
        }
        ref command => {
            let output = match &cli.snapshot {
                Some(path) => {
                    let tracer = SnapshotTracer::open(path).await?;
                    let output = run_query(&tracer, command).await?;
                    if *command == Command::SetHighRisk {
                        tracer.save(path).await?;
                    }
                    output
                }
                None => {
                    let graph = connect(&cli.config).await?;
                    run_query(&graph, command).await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// `load` and `export` always talk to Neo4j, so a snapshot file is rejected.
fn check_snapshot_usage(cli: &Cli) -> anyhow::Result<()> {
    if let (Some(path), Command::Load { .. } | Command::Export { .. }) =
        (&cli.snapshot, &cli.command)
    {
        anyhow::bail!(
            "--snapshot {} cannot be used with load or export, which require Neo4j",
            path.display()
        );
    }
    Ok(())
}

/// Answer one query command through any backend.
async fn run_query(
    tracer: &dyn ContactTracer,
    command: &Command,
) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::Labels => json!(tracer.list_labels().await?),
        Command::Spreaders => json!(tracer.possible_spreaders().await?),
        Command::SpreadCounts => json!(tracer.possible_spread_counts().await?),
        Command::Careless => json!(tracer.careless_people().await?),
        Command::Careful => json!(tracer.socially_careful().await?),
        Command::Inform => json!(tracer.people_to_inform().await?),
        Command::SetHighRisk => json!(tracer.set_high_risk().await?),
        Command::Companions { name } => json!(tracer.healthy_companions_of(name).await?),
        Command::TopSickSite => json!(tracer.top_sick_site().await?),
        Command::SickFrom { names } => json!(tracer.sick_from(names).await?),
        Command::Load { .. } | Command::Export { .. } => {
            anyhow::bail!("load and export are not queries")
        }
    };
    Ok(value)
}

fn init_logging(log_config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_config.level));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if log_config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn connect(file_prefix: &str) -> anyhow::Result<GraphClient> {
    let graph_config: GraphConfig =
        config::load_section(file_prefix, DEFAULT_ENV_PREFIX, "neo4j")?;
    Ok(GraphClient::connect(&graph_config).await?)
}
