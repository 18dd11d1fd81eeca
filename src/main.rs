//! Toleration webhook - mutating admission webhook for pod tolerations

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use toleration_webhook::config::MutationConfig;
use toleration_webhook::mutate::Mutator;
use toleration_webhook::webhook::{start_webhook_server, WebhookState, DEFAULT_PROBE_USER_AGENT};

/// Mutating admission webhook that injects node tolerations into pods
#[derive(Parser, Debug)]
#[command(name = "toleration-webhook", version, about, long_about = None)]
struct Cli {
    /// Address to listen on (TLS is terminated in front of this process)
    #[arg(long, default_value = "0.0.0.0:8443")]
    listen: SocketAddr,

    /// YAML file with the tolerations to enforce; the built-in default is
    /// used when absent
    #[arg(long)]
    tolerations_file: Option<PathBuf>,

    /// User-Agent prefix identifying liveness/readiness probe traffic
    #[arg(long, default_value = DEFAULT_PROBE_USER_AGENT)]
    probe_user_agent: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.tolerations_file {
        Some(path) => MutationConfig::from_file(path)?,
        None => MutationConfig::default(),
    };
    tracing::info!(
        tolerations = config.tolerations.len(),
        "loaded mutation configuration"
    );

    let state = WebhookState::new(Mutator::pod_tolerations(config))
        .with_probe_user_agent(cli.probe_user_agent);

    start_webhook_server(cli.listen, Arc::new(state)).await?;
    Ok(())
}
