//! TCP acceptor that gives every connection its own task.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use logging_sink::LogSink;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::config::SessionConfig;
use crate::connection::drive_connection;
use crate::error::DaemonError;
use crate::session::Session;

/// Default cap on concurrently served connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 128;

/// Default per-read session timeout, matching the original server's
/// 60-second session timeout.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default listen address of the original SLF4Fx server.
#[must_use]
pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 18888))
}

/// Configuration for the connection acceptor.
#[derive(Clone, Debug)]
pub struct ListenerConfig {
    bind_address: SocketAddr,
    max_connections: usize,
    session_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerConfig {
    /// Creates a configuration with the default bind address, connection
    /// cap and session timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }

    /// Sets the address to bind to.
    #[must_use]
    pub fn bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Sets the maximum number of concurrently served connections.
    #[must_use]
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Sets the per-read session timeout.
    #[must_use]
    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }
}

/// Bound SLF4Fx endpoint ready to accept connections.
pub struct Server {
    listener: TcpListener,
    config: ListenerConfig,
    session_config: Arc<SessionConfig>,
    sink: Arc<dyn LogSink>,
}

impl Server {
    /// Binds the listener.
    pub async fn bind(
        config: ListenerConfig,
        session_config: Arc<SessionConfig>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, DaemonError> {
        let listener =
            TcpListener::bind(config.bind_address)
                .await
                .map_err(|source| DaemonError::Bind {
                    addr: config.bind_address,
                    source,
                })?;
        Ok(Self {
            listener,
            config,
            session_config,
            sink,
        })
    }

    /// Returns the bound local address, useful when binding to port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the accept loop fails.
    ///
    /// Each accepted connection gets a fresh unauthenticated [`Session`]
    /// and runs on its own task; the semaphore bounds how many run at
    /// once. Protocol-level teardowns are handled inside the connection
    /// task and never disturb the accept loop.
    pub async fn serve(self) -> Result<(), DaemonError> {
        let limiter = Arc::new(Semaphore::new(self.config.max_connections));
        loop {
            let Ok(permit) = limiter.clone().acquire_owned().await else {
                // The semaphore is never closed while serving.
                return Ok(());
            };
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .map_err(|source| DaemonError::Accept { source })?;
            tracing::debug!(%peer, "accepted connection");

            let session = Session::new(self.session_config.clone(), self.sink.clone());
            let timeout = self.config.session_timeout;
            tokio::spawn(async move {
                if let Err(error) = drive_connection(stream, session, timeout).await {
                    tracing::debug!(%peer, %error, "connection ended with I/O error");
                }
                drop(permit);
            });
        }
    }
}
