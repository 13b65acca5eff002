// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! holo-agent: terminal-side sync agent for the holo attendance system.
//!
//! Wires the offline core together: opens the durable outbox, drains it
//! against the submission endpoint when connectivity allows, and consumes the
//! live push stream with automatic reconnect.

use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use holo_client::stream::WebSocketTransport;
use holo_client::{
    AgentConfig, HttpSubmitter, LiveStream, NetworkMonitor, Outbox, SyncEngine, SyncNotice,
};

/// holo-agent: offline-first sync agent for attendance terminals
#[derive(Parser, Debug)]
#[command(name = "holo-agent")]
#[command(about = "Offline-first sync agent for holo attendance terminals")]
struct Args {
    /// Path to the agent config file
    #[arg(short, long, default_value = "agent.toml")]
    config: PathBuf,

    /// Override the submission endpoint URL
    #[arg(long)]
    server_url: Option<String>,

    /// Override the push stream URL
    #[arg(long)]
    stream_url: Option<String>,

    /// Override the outbox database path
    #[arg(long)]
    queue: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AgentConfig::load_or_default(&args.config)?;
    if let Some(url) = args.server_url {
        config.server_url = url;
    }
    if let Some(url) = args.stream_url {
        config.stream_url = url;
    }
    if let Some(path) = args.queue {
        config.queue_path = path;
    }

    info!("Starting holo-agent");
    info!("  Submission endpoint: {}", config.server_url);
    info!("  Stream endpoint: {}", config.stream_url);
    info!("  Outbox: {}", config.queue_path.display());

    let outbox = Arc::new(Mutex::new(Outbox::open(&config.queue_path)?));
    let submitter = HttpSubmitter::new(config.server_url.clone(), config.request_timeout())?;
    let engine = Arc::new(SyncEngine::new(outbox, Box::new(submitter))?);

    engine.notices().register(|notice| {
        let SyncNotice::Rejected { record, status, .. } = notice;
        tracing::warn!(
            id = record.id,
            status = *status,
            "record permanently rejected by server"
        );
    });

    let stream = LiveStream::new(config.stream_config());
    let stream_task = tokio::spawn(Arc::clone(&stream).run(WebSocketTransport::new()));

    // No host connectivity signal on this platform, so the monitor runs in
    // its degraded always-online mode and submission errors stand in for
    // offline detection. The periodic drain below retries the backlog.
    let monitor = NetworkMonitor::assume_online();
    let states = monitor.subscribe();

    let engine_runner = Arc::clone(&engine);
    tokio::spawn(async move { engine_runner.run(states).await });

    if let Some(interval) = config.drain_interval() {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = engine.drain().await {
                    tracing::error!("periodic drain failed: {}", e);
                }
            }
        });
    }

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    stream.shutdown();
    let _ = stream_task.await;
    drop(monitor);

    Ok(())
}
