//! catalogd Server Binary
//!
//! Starts the TCP server for catalogd.

use std::sync::Arc;

use catalogd::network::Server;
use catalogd::{Config, Dispatcher};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// catalogd Server
#[derive(Parser, Debug)]
#[command(name = "catalogd-server")]
#[command(about = "One-shot JSON request/response server for categories")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Read timeout per connection in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Write timeout per connection in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Largest request payload accepted, in bytes
    #[arg(long, default_value = "1048576")]
    max_request_bytes: usize,

    /// Start with an empty store instead of the seed categories
    #[arg(long)]
    no_seed: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalogd=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("catalogd Server v{}", catalogd::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = build_config(&args);

    let dispatcher = Arc::new(Dispatcher::from_config(&config));
    tracing::info!("Store initialized with {} categories", dispatcher.store().len());

    // Start server
    let mut server = Server::new(config, dispatcher);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Build config from args
fn build_config(args: &Args) -> Config {
    Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .max_request_bytes(args.max_request_bytes)
        .seed_store(!args.no_seed)
        .build()
}
