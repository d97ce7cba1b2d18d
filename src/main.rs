//! chainpoint - submit, retrieve and verify Chainpoint proofs

use anyhow::Context;
use chainpoint_client::{ChainpointClient, NetworkConfig, ProofHandle};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "chainpoint")]
#[command(about = "Client for the Chainpoint proof anchoring network")]
struct Args {
    /// Log level
    #[arg(long, env = "CHAINPOINT_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit hex hashes and print the resulting proof handles
    Submit {
        /// Hashes to submit (even-length hex)
        #[arg(required = true)]
        hashes: Vec<String>,

        /// Gateway URI to submit to (repeatable); skips discovery
        #[arg(long = "gateway")]
        gateways: Vec<String>,
    },

    /// Retrieve proofs for a JSON array of proof handles
    Get {
        /// File holding the handles, `-` for stdin
        #[arg(long)]
        handles: String,
    },

    /// Verify a JSON array of proofs
    Verify {
        /// File holding the proofs, `-` for stdin
        #[arg(long)]
        proofs: String,

        /// Gateway URI used for every anchor lookup
        #[arg(long)]
        gateway: Option<String>,
    },

    /// Discover Gateways through the Core network
    Discover {
        /// Check each Gateway's reachability
        #[arg(long)]
        probe: bool,
    },
}

#[derive(Serialize)]
struct ProbedGateway {
    uri: String,
    reachable: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting chainpoint v{}", env!("CARGO_PKG_VERSION"));

    let client = ChainpointClient::new(NetworkConfig::from_env())?;

    match args.command {
        Command::Submit { hashes, gateways } => {
            let handles = client.submit_hashes(&hashes, &gateways).await?;
            print_json(&handles)
        }
        Command::Get { handles } => {
            let input = read_input(&handles)?;
            let handles: Vec<ProofHandle> = serde_json::from_str(&input)
                .context("handles must be a JSON array of proof handles")?;
            let proofs = client.get_proofs(&handles).await?;
            print_json(&proofs)
        }
        Command::Verify { proofs, gateway } => {
            let input = read_input(&proofs)?;
            let proofs = proof_list(serde_json::from_str(&input).context("proofs must be JSON")?);
            let results = client.verify_proofs(&proofs, gateway.as_deref()).await?;
            print_json(&results)
        }
        Command::Discover { probe } => {
            let gateways = client.discover_gateways().await?;
            if probe {
                let probed: Vec<ProbedGateway> = client
                    .probe_gateways(&gateways)
                    .await
                    .into_iter()
                    .map(|(uri, reachable)| ProbedGateway { uri, reachable })
                    .collect();
                print_json(&probed)
            } else {
                print_json(&gateways)
            }
        }
    }
}

/// Read a whole file, or stdin for `-`
fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

/// Accept either a single proof or an array of proofs
fn proof_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
