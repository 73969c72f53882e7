use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use graphscout::mcp::{outcome_json, McpServer};
use graphscout::scout::GraphScout;
use graphscout::types::NodeKind;

/// Element resolution and hybrid graph + vector search over a code graph.
#[derive(Parser)]
#[command(
    name = "graphscout",
    about = "Element resolution and hybrid graph + vector search over a code graph"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new graphscout project
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Project id used to qualify bare element ids
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Show graph statistics
    Status {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Resolve an element reference to a graph node
    Resolve {
        /// Element id, name, qualified name, or file path
        element: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Semantic search over one element type
    Semantic {
        /// Natural-language query
        query: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Element type (function, class, file, ...)
        #[arg(short, long, default_value = "function")]
        kind: String,
        /// Maximum results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Find near-duplicate implementations grouped by directory
    Duplicates {
        /// Element name or description
        name: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Element type
        #[arg(short, long, default_value = "function")]
        kind: String,
    },
    /// Search functions, classes and files for a described behavior
    Meaning {
        /// Description of the behavior
        meaning: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Maximum results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Check whether an element is worth consolidating
    Refactor {
        /// Element name or description
        element: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Element type
        #[arg(short, long, default_value = "function")]
        kind: String,
    },
    /// Combined graph name match and vector search
    Hybrid {
        /// Name fragment or query
        query: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Element type
        #[arg(short, long, default_value = "function")]
        kind: String,
    },
    /// Start the MCP server on stdio
    Serve {
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> graphscout::errors::Result<()> {
    match cli.command {
        Commands::Init { path, project_id } => {
            let project_path = resolve_path(path);
            let scout = GraphScout::init(&project_path, project_id.as_deref())?;
            println!("Initialized graphscout at {}", project_path.display());
            println!(
                "  Graph snapshot: {}",
                scout.get_config().snapshot_path(scout.project_root()).display()
            );
        }
        Commands::Status { path, json } => {
            let project_path = resolve_path(path);
            let scout = GraphScout::open(&project_path)?;
            let stats = scout.get_stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("graphscout Status");
                if let Some(project_id) = &stats.project_id {
                    println!("  Project: {}", project_id);
                }
                println!("  Nodes:   {}", stats.node_count);
                println!(
                    "  Vectors: {}",
                    if stats.vectors_available { "available" } else { "unavailable" }
                );
                if !stats.nodes_by_kind.is_empty() {
                    println!("\n  Nodes by kind:");
                    let mut sorted: Vec<_> = stats.nodes_by_kind.iter().collect();
                    sorted.sort_by_key(|(k, _)| (*k).clone());
                    for (kind, count) in &sorted {
                        println!("    {}: {}", kind, count);
                    }
                }
            }
        }
        Commands::Resolve { element, path } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            match scout.resolve_detailed(&element) {
                Some(resolution) => {
                    let node = resolution.node;
                    println!(
                        "{} ({}) - {} [{}]",
                        node.id,
                        node.kind.as_str(),
                        node.name().or(node.path()).unwrap_or("-"),
                        resolution.strategy
                    );
                }
                None => println!("Element not found: {}", element),
            }
        }
        Commands::Semantic {
            query,
            path,
            kind,
            limit,
        } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            let kind = parse_kind(&kind)?;
            let outcome = scout.engine().semantic_search(&query, kind, limit).await;
            print_json(&outcome_json(outcome))?;
        }
        Commands::Duplicates { name, path, kind } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            let kind = parse_kind(&kind)?;
            let outcome = scout.engine().find_duplicates(&name, kind).await;
            print_json(&outcome_json(outcome))?;
        }
        Commands::Meaning {
            meaning,
            path,
            limit,
        } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            let outcome = scout.engine().meaning_search(&meaning, limit).await;
            print_json(&outcome_json(outcome))?;
        }
        Commands::Refactor {
            element,
            path,
            kind,
        } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            let kind = parse_kind(&kind)?;
            let outcome = scout.engine().suggest_refactor(&element, kind).await;
            print_json(&outcome_json(outcome))?;
        }
        Commands::Hybrid { query, path, kind } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            let kind = parse_kind(&kind)?;
            let outcome = scout.engine().hybrid_search(&query, kind).await;
            print_json(&outcome_json(outcome))?;
        }
        Commands::Serve { path } => {
            let scout = GraphScout::open(&resolve_path(path))?;
            McpServer::new(scout).run().await?;
        }
    }
    Ok(())
}

fn parse_kind(raw: &str) -> graphscout::errors::Result<NodeKind> {
    NodeKind::from_str(raw).ok_or_else(|| graphscout::errors::GraphScoutError::InvalidArgument {
        message: format!("unknown element type: {raw}"),
    })
}

fn print_json(value: &serde_json::Value) -> graphscout::errors::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
