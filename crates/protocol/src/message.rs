//! Message shapes and tag bytes exchanged with SLF4Fx clients.
//!
//! The message set is fixed and small: two authenticated inbound requests,
//! one literal-match inbound request for the Flash policy handshake, and two
//! outbound responses. The numeric tag values are dictated by the existing
//! ActionScript client and must never change.

/// The fixed policy-file handshake request, including the leading `<` that
/// doubles as its tag byte and the trailing NUL.
///
/// Socket-capable browser plugins send these 23 ASCII bytes before opening a
/// data connection; anything else after a `<` tag is malformed.
pub const POLICY_FILE_REQUEST: &[u8; 23] = b"<policy-file-request/>\0";

/// Tag bytes identifying message variants on the wire.
///
/// The values mirror the original SLF4Fx suite's message-type constants so
/// existing clients interoperate without renegotiation. The policy-file
/// response is absent: it is the one outbound format written without a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum MessageTag {
    /// Client asks for access with an application-id/secret pair.
    AccessRequest = 0x01,
    /// Server grants or rejects a preceding access request.
    AccessResponse = 0x02,
    /// Client submits one structured log event.
    LogRecord = 0x03,
    /// Leading byte of the fixed `<policy-file-request/>` literal.
    PolicyFileRequest = 0x3C,
}

impl MessageTag {
    /// Ordered list of all tags understood by the protocol.
    pub const ALL: [MessageTag; 4] = [
        MessageTag::AccessRequest,
        MessageTag::AccessResponse,
        MessageTag::LogRecord,
        MessageTag::PolicyFileRequest,
    ];

    /// Returns the numeric representation expected on the wire.
    #[must_use]
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Attempts to construct a [`MessageTag`] from its on-the-wire byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::AccessRequest),
            0x02 => Some(Self::AccessResponse),
            0x03 => Some(Self::LogRecord),
            0x3C => Some(Self::PolicyFileRequest),
            _ => None,
        }
    }

    /// Reports whether this tag may appear on messages sent by a client.
    ///
    /// An inbound `0x02` is treated the same as any unknown byte: the
    /// access-response tag belongs to the server alone.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(
            self,
            Self::AccessRequest | Self::LogRecord | Self::PolicyFileRequest
        )
    }
}

/// Severity carried by a [`InboundMessage::LogRecord`].
///
/// Wire values 0-3 map to the four levels; anything else is accepted and
/// silently treated as `Info`, matching the behaviour every deployed client
/// generation relies on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LogLevel {
    /// Wire value 0.
    Error,
    /// Wire value 1.
    Warn,
    /// Wire value 2.
    Info,
    /// Wire value 3.
    Debug,
}

impl LogLevel {
    /// Returns the numeric representation expected on the wire.
    #[must_use]
    pub const fn as_wire(self) -> i32 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
        }
    }

    /// Maps a wire value to a level, degrading unknown values to `Info`
    /// with a diagnostic log line rather than rejecting the record.
    #[must_use]
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            other => {
                tracing::debug!(level = other, "unknown log record level, mapping to INFO");
                Self::Info
            }
        }
    }
}

/// Messages a client may send to the server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InboundMessage {
    /// Authentication request carrying the application's credentials.
    AccessRequest {
        /// Identifier the client wants its log categories scoped under.
        application_id: String,
        /// Shared secret checked against the server's credential table.
        secret: String,
    },
    /// One structured log event.
    LogRecord {
        /// Client-side category, appended to the server's category prefix
        /// and the application id at forward time.
        category: String,
        /// Severity of the event.
        level: LogLevel,
        /// Literal log text.
        message: String,
    },
    /// The fixed cross-domain policy handshake. Carries no fields.
    PolicyFileRequest,
}

/// Messages the server may send back to a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutboundMessage {
    /// Answer to an [`InboundMessage::AccessRequest`].
    AccessResponse {
        /// Whether the credentials were accepted.
        granted: bool,
    },
    /// Answer to an [`InboundMessage::PolicyFileRequest`].
    PolicyFileResponse {
        /// Configured cross-domain policy XML, or `None` when the server
        /// has no policy configured (the response is then a lone NUL).
        xml: Option<String>,
    },
}
