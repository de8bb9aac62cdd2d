use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde_json::{json, Value};

use dsql_router::config::{load_config, HealthStrategyKind, RouterConfig};
use dsql_router::health::{HealthCache, HealthProber, HealthStrategy};
use dsql_router::latency::LatencyProber;
use dsql_router::net::{ConnectProbe, TcpConnectProbe};
use dsql_router::observability::logging::init_logging;
use dsql_router::registry::EndpointRegistry;
use dsql_router::selector::{EndpointSelector, RankedCandidate};

#[derive(Parser)]
#[command(name = "dsql-router")]
#[command(
    about = "Inspect endpoint health and latency ranking for a DSQL router config",
    long_about = None
)]
struct Cli {
    /// Path to the JSON or TOML configuration file.
    #[arg(short, long, default_value = "dsql_config.json")]
    config: PathBuf,

    /// Overrides `observability.log_level` from the config.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every endpoint and print its health verdict
    Check,
    /// Rank endpoints by health, latency and priority
    Rank,
    /// Print only the best endpoint
    Best,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    init_logging(&level);

    let selector = build_selector(&config)?;

    let output = match cli.command {
        Commands::Check => check(&selector).await,
        Commands::Rank => rank(&selector, false).await,
        Commands::Best => rank(&selector, true).await,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_selector(config: &RouterConfig) -> Result<EndpointSelector, Box<dyn std::error::Error>> {
    if config.health.strategy == HealthStrategyKind::Remote {
        tracing::warn!("Remote health provider is not available from the CLI, probing directly");
    }

    let registry = Arc::new(EndpointRegistry::from_config(config)?);
    let probe: Arc<dyn ConnectProbe> = Arc::new(TcpConnectProbe::new());
    let health = HealthProber::new(
        HealthStrategy::Direct,
        Arc::clone(&probe),
        HealthCache::new(),
        &config.health,
    );
    let latency = LatencyProber::new(probe, &config.latency);
    Ok(EndpointSelector::new(registry, health, latency, &config.selection))
}

async fn check(selector: &EndpointSelector) -> Value {
    let endpoints = selector.registry().all();
    let verdicts = join_all(endpoints.iter().map(|e| selector.health().get_health(e))).await;

    let rows: Vec<Value> = endpoints
        .iter()
        .zip(verdicts)
        .map(|(endpoint, state)| {
            json!({
                "cluster_id": endpoint.cluster_id,
                "region": endpoint.region,
                "address": endpoint.address(),
                "health": state,
            })
        })
        .collect();
    Value::Array(rows)
}

async fn rank(selector: &EndpointSelector, best_only: bool) -> Value {
    match selector.rank_candidates(selector.registry().all()).await {
        Ok(ranked) if best_only => ranked.first().map_or(Value::Null, |c| describe(1, c)),
        Ok(ranked) => Value::Array(
            ranked
                .iter()
                .enumerate()
                .map(|(i, c)| describe(i + 1, c))
                .collect(),
        ),
        Err(verdicts) => json!({
            "error": "no healthy endpoints",
            "endpoints": verdicts
                .iter()
                .map(|(e, state)| json!({ "cluster_id": e.cluster_id, "health": state }))
                .collect::<Vec<_>>(),
        }),
    }
}

fn describe(rank: usize, candidate: &RankedCandidate) -> Value {
    let latency_ms = candidate
        .latency
        .is_measured()
        .then(|| candidate.latency.latency_ms());
    json!({
        "rank": rank,
        "cluster_id": candidate.endpoint.cluster_id,
        "region": candidate.endpoint.region,
        "address": candidate.endpoint.address(),
        "priority": candidate.endpoint.priority,
        "health": candidate.health,
        "latency_ms": latency_ms,
        "retries_used": candidate.latency.retries_used,
    })
}
