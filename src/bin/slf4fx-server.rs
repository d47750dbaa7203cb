#![deny(unsafe_code)]

//! Standalone SLF4Fx daemon: binds a TCP endpoint, authenticates Flash
//! clients and forwards their log records through `tracing`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use daemon::{
    DEFAULT_CATEGORY_PREFIX, DEFAULT_MAX_CONNECTIONS, DaemonError, ListenerConfig, Server,
    SessionConfig, default_bind_address, load_credentials,
};
use logging_sink::TracingSink;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "slf4fx-server", version, about = "SLF4Fx remote-logging daemon")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value_t = default_bind_address())]
    address: SocketAddr,

    /// Credentials file with one `application-id:secret` entry per line.
    /// Without one, every access request is granted.
    #[arg(long, value_name = "FILE")]
    credentials: Option<PathBuf>,

    /// File whose contents answer Flash policy-file requests.
    #[arg(long, value_name = "FILE")]
    policy_file: Option<PathBuf>,

    /// Prefix prepended to forwarded log categories. An empty value drops
    /// the prefix segment entirely.
    #[arg(long, default_value = DEFAULT_CATEGORY_PREFIX)]
    category_prefix: String,

    /// Seconds a session may stay idle before it is closed.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Maximum number of concurrently served connections.
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: usize,
}

fn session_config(args: &Args) -> Result<SessionConfig, DaemonError> {
    let mut config = SessionConfig::new().category_prefix(if args.category_prefix.is_empty() {
        None
    } else {
        Some(args.category_prefix.clone())
    });

    if let Some(path) = &args.credentials {
        config = config.credentials(load_credentials(path)?);
    }
    if let Some(path) = &args.policy_file {
        let xml = std::fs::read_to_string(path).map_err(|source| DaemonError::PolicyFile {
            path: path.clone(),
            source,
        })?;
        config = config.policy_file_response(Some(xml));
    }
    Ok(config)
}

async fn run(args: Args) -> Result<(), DaemonError> {
    let session_config = Arc::new(session_config(&args)?);
    let listener_config = ListenerConfig::new()
        .bind_address(args.address)
        .max_connections(args.max_connections)
        .session_timeout(Duration::from_secs(args.timeout));

    let server = Server::bind(listener_config, session_config, Arc::new(TracingSink::new())).await?;
    if let Ok(address) = server.local_addr() {
        tracing::info!(%address, "listening for SLF4Fx clients");
    }

    tokio::select! {
        result = server.serve() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(error) = run(args).await {
        tracing::error!(%error, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
