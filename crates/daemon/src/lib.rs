#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `daemon` turns the pure byte codec from the `protocol` crate into a
//! running SLF4Fx endpoint. It owns everything stateful about a connection:
//! the per-session authentication state, the accumulation buffer that
//! absorbs partial TCP reads, and the tokio acceptor that hands each
//! connection its own task.
//!
//! # Design
//!
//! - [`SessionConfig`] is built once before serving and shared read-only
//!   across every connection; nothing mutates process-wide state after
//!   startup.
//! - [`Session`] is the per-connection state machine. It consumes decoded
//!   inbound messages, produces at most one outbound message each, and
//!   forwards authenticated log records to the shared
//!   [`logging_sink::LogSink`].
//! - [`drive_connection`] is generic over `AsyncRead + AsyncWrite`, so the
//!   same loop runs against a real `TcpStream` in production and an
//!   in-memory duplex pipe in tests.
//! - [`Server`] binds a listener and spawns one task per accepted
//!   connection, bounded by a semaphore. Connections never block each
//!   other; within one connection, decode and dispatch are strictly
//!   sequential because handling an access request changes how subsequent
//!   log records are interpreted.

mod config;
mod connection;
mod error;
mod listener;
mod session;

pub use config::{CredentialsError, DEFAULT_CATEGORY_PREFIX, SessionConfig, load_credentials};
pub use connection::drive_connection;
pub use error::DaemonError;
pub use listener::{
    DEFAULT_MAX_CONNECTIONS, DEFAULT_SESSION_TIMEOUT, ListenerConfig, Server, default_bind_address,
};
pub use session::Session;
