//! social_store REST server
//!
//! A standalone server binary serving an in-memory social graph over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use social_store::transport::http;
use social_store::{Database, MemberType, ResolverConfig, SocialGraph};

/// Server configuration
#[derive(Debug, Parser)]
#[command(name = "social-server", version, about = "social_store REST server")]
struct Config {
    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Start without the default member types
    #[arg(long)]
    no_seed: bool,

    /// Worker threads for per-user joins (1 = inline)
    #[arg(long, default_value_t = 1)]
    fanout_workers: usize,

    /// Queue slots per fan-out
    #[arg(long, default_value_t = 64)]
    fanout_queue_capacity: usize,
}

impl Config {
    fn resolver(&self) -> ResolverConfig {
        ResolverConfig {
            fanout_workers: self.fanout_workers,
            fanout_queue_capacity: self.fanout_queue_capacity,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_store=info,social_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), ?config, "starting social-server");

    let seeds = if config.no_seed {
        Vec::new()
    } else {
        MemberType::defaults()
    };
    let db = Database::seeded(seeds)?;
    let graph = Arc::new(SocialGraph::with_config(db, config.resolver()));
    tracing::debug!(
        fanout_workers = graph.config().fanout_workers,
        fanout_queue_capacity = graph.config().fanout_queue_capacity,
        "resolver ready"
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening; press Ctrl+C to stop");

    http::serve(graph, listener, async {
        let _ = signal::ctrl_c().await;
    })
    .await?;

    tracing::info!("shut down");
    Ok(())
}
