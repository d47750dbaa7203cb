//! Daemon-level error reporting.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::CredentialsError;

/// Failures that abort daemon startup or the accept loop.
///
/// Protocol violations on individual connections are deliberately absent:
/// they tear down one connection and are logged there, never bubbling up
/// to the server.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Binding the listen address failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Accepting a connection failed.
    #[error("failed to accept a connection: {source}")]
    Accept {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The credentials file could not be loaded.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    /// The policy-file response could not be read.
    #[error("failed to read policy file {}: {source}", .path.display())]
    PolicyFile {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_bind_address() {
        let error = DaemonError::Bind {
            addr: crate::listener::default_bind_address(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(error.to_string().contains("127.0.0.1:18888"));
    }

    #[test]
    fn credentials_errors_pass_through() {
        let inner = CredentialsError::MissingSeparator {
            path: PathBuf::from("table.secrets"),
            line: 3,
        };
        let error = DaemonError::from(inner);
        assert!(error.to_string().contains("table.secrets:3"));
    }
}
