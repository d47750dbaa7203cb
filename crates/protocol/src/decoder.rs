//! Frame decoder: turns accumulated connection bytes into typed messages.
//!
//! The decoder is a pure function over the unconsumed bytes of a connection.
//! It peeks the leading byte, dispatches to the one matching message
//! decoder, and reports how many bytes the message occupied so the caller
//! can discard exactly that prefix. Partial arrivals surface as
//! [`DecodeOutcome::Incomplete`] with nothing consumed; the caller retries
//! the identical decode once more bytes are appended. No decode state
//! survives between calls.

use crate::cursor::Cursor;
use crate::error::{DecodeError, Incomplete};
use crate::fields::read_utf8;
use crate::message::{InboundMessage, LogLevel, MessageTag, POLICY_FILE_REQUEST};

/// Result of attempting to decode one message from the front of a buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeOutcome {
    /// A complete message was decoded.
    Message {
        /// The decoded message.
        message: InboundMessage,
        /// Exact number of bytes the message occupied, to be discarded
        /// from the front of the buffer.
        consumed: usize,
    },
    /// Not enough bytes buffered yet. Nothing was consumed; retry once
    /// more bytes arrive.
    Incomplete,
    /// The leading byte matched a known tag but the payload violated its
    /// format. Fatal for the connection.
    Malformed(DecodeError),
    /// The leading byte matched no known inbound tag. Fatal for the
    /// connection, since byte alignment can no longer be trusted.
    UnrecognizedTag(u8),
}

enum Interrupt {
    Incomplete,
    Malformed(&'static str),
}

impl From<Incomplete> for Interrupt {
    fn from(_: Incomplete) -> Self {
        Self::Incomplete
    }
}

/// Attempts to decode one inbound message from the front of `buf`.
///
/// An empty buffer is [`DecodeOutcome::Incomplete`]. A leading byte outside
/// the inbound tag set (including the server-only access-response tag)
/// yields [`DecodeOutcome::UnrecognizedTag`] regardless of what follows.
#[must_use]
pub fn decode_message(buf: &[u8]) -> DecodeOutcome {
    let mut cursor = Cursor::new(buf);
    let Some(lead) = cursor.peek_u8() else {
        return DecodeOutcome::Incomplete;
    };
    let tag = match MessageTag::from_u8(lead) {
        Some(tag) if tag.is_inbound() => tag,
        _ => return DecodeOutcome::UnrecognizedTag(lead),
    };

    let result = match tag {
        MessageTag::AccessRequest => decode_access_request(&mut cursor),
        MessageTag::LogRecord => decode_log_record(&mut cursor),
        MessageTag::PolicyFileRequest => decode_policy_file_request(&mut cursor),
        // Filtered out above by `is_inbound`.
        MessageTag::AccessResponse => return DecodeOutcome::UnrecognizedTag(lead),
    };

    match result {
        Ok(message) => DecodeOutcome::Message {
            message,
            consumed: cursor.position(),
        },
        Err(Interrupt::Incomplete) => DecodeOutcome::Incomplete,
        Err(Interrupt::Malformed(reason)) => {
            DecodeOutcome::Malformed(DecodeError::Malformed { reason })
        }
    }
}

fn decode_access_request(cursor: &mut Cursor<'_>) -> Result<InboundMessage, Interrupt> {
    cursor.read_u8()?;
    let application_id = read_utf8(cursor)?;
    let secret = read_utf8(cursor)?;
    Ok(InboundMessage::AccessRequest {
        application_id,
        secret,
    })
}

fn decode_log_record(cursor: &mut Cursor<'_>) -> Result<InboundMessage, Interrupt> {
    cursor.read_u8()?;
    let category = read_utf8(cursor)?;
    let level = LogLevel::from_wire(cursor.read_i32()?);
    let message = read_utf8(cursor)?;
    Ok(InboundMessage::LogRecord {
        category,
        level,
        message,
    })
}

fn decode_policy_file_request(cursor: &mut Cursor<'_>) -> Result<InboundMessage, Interrupt> {
    cursor.read_u8()?;
    let body = cursor.read_exact(POLICY_FILE_REQUEST.len() - 1)?;
    if body != &POLICY_FILE_REQUEST[1..] {
        return Err(Interrupt::Malformed(
            "expected the <policy-file-request/> literal followed by NUL",
        ));
    }
    Ok(InboundMessage::PolicyFileRequest)
}
