//! Per-connection session state machine.
//!
//! A session starts unauthenticated. A granted access request records the
//! application id; from then on log records are forwarded to the sink under
//! `prefix.application_id.category`. A rejected request leaves whatever
//! state the session already had, so an authenticated client that fumbles a
//! re-authentication keeps its original scope. Policy-file requests are
//! answered unconditionally — the Flash handshake happens before a client
//! can possibly have authenticated.

use std::sync::Arc;

use logging_sink::LogSink;
use protocol::{InboundMessage, LogLevel, OutboundMessage};

use crate::config::SessionConfig;

/// Authentication and routing state for one connection.
pub struct Session {
    config: Arc<SessionConfig>,
    sink: Arc<dyn LogSink>,
    application_id: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an unauthenticated session sharing the server's
    /// configuration and sink.
    #[must_use]
    pub fn new(config: Arc<SessionConfig>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            sink,
            application_id: None,
        }
    }

    /// Returns the authenticated application id, if any.
    #[must_use]
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    /// Consumes one decoded inbound message and returns the response to
    /// write back, if the message warrants one.
    ///
    /// Per the protocol contract this produces at most one outbound
    /// message per inbound message; log records never produce one.
    pub fn handle(&mut self, message: InboundMessage) -> Option<OutboundMessage> {
        match message {
            InboundMessage::AccessRequest {
                application_id,
                secret,
            } => Some(self.handle_access_request(application_id, &secret)),
            InboundMessage::LogRecord {
                category,
                level,
                message,
            } => {
                self.handle_log_record(&category, level, &message);
                None
            }
            InboundMessage::PolicyFileRequest => Some(OutboundMessage::PolicyFileResponse {
                xml: self.config.policy_response().map(str::to_owned),
            }),
        }
    }

    fn handle_access_request(&mut self, application_id: String, secret: &str) -> OutboundMessage {
        let granted = self.config.accepts_all()
            || self
                .config
                .secret_for(&application_id)
                .is_some_and(|expected| expected == secret);

        if granted {
            tracing::debug!(application_id, "access request granted");
            // A repeated successful request re-scopes the session.
            self.application_id = Some(application_id);
        } else {
            tracing::info!(application_id, "access request rejected");
        }
        OutboundMessage::AccessResponse { granted }
    }

    fn handle_log_record(&self, category: &str, level: LogLevel, message: &str) {
        let Some(application_id) = self.application_id.as_deref() else {
            // Dropped without a diagnostic; an unauthenticated peer must
            // not be able to write anything into the logs.
            return;
        };
        let qualified = qualified_category(self.config.prefix(), application_id, category);
        self.sink.forward(&qualified, level, message);
    }
}

/// Joins the configured prefix, application id and client category with
/// dots, omitting the prefix segment when unconfigured.
fn qualified_category(prefix: Option<&str>, application_id: &str, category: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{application_id}.{category}"),
        None => format!("{application_id}.{category}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_join_includes_prefix_when_configured() {
        assert_eq!(
            qualified_category(Some("slf4fx"), "app", "ui.button"),
            "slf4fx.app.ui.button"
        );
    }

    #[test]
    fn category_join_omits_prefix_when_unconfigured() {
        assert_eq!(qualified_category(None, "app", "x"), "app.x");
    }
}
