//! Serialisation of messages back to wire bytes.
//!
//! Outbound encoding is infallible: the two response shapes carry no
//! length-prefixed fields. The inbound-message encoders exist for test
//! fixtures and embedded clients that need the exact byte representation a
//! real ActionScript client would produce.

use crate::error::EncodeError;
use crate::fields::write_utf8;
use crate::message::{LogLevel, MessageTag, OutboundMessage};

/// Appends the wire representation of an outbound message to `out`.
///
/// The access response is the tag byte `0x02` followed by `0x01` or `0x00`.
/// The policy-file response is the raw UTF-8 bytes of the configured text
/// (nothing when unconfigured) terminated by a single NUL; it carries no
/// tag, which is what distinguishes it on the wire.
pub fn encode_message(message: &OutboundMessage, out: &mut Vec<u8>) {
    match message {
        OutboundMessage::AccessResponse { granted } => {
            out.push(MessageTag::AccessResponse.as_u8());
            out.push(u8::from(*granted));
        }
        OutboundMessage::PolicyFileResponse { xml } => {
            if let Some(xml) = xml {
                out.extend_from_slice(xml.as_bytes());
            }
            out.push(0);
        }
    }
}

/// Appends an access request exactly as a client would send it.
pub fn encode_access_request(
    out: &mut Vec<u8>,
    application_id: &str,
    secret: &str,
) -> Result<(), EncodeError> {
    out.push(MessageTag::AccessRequest.as_u8());
    write_utf8(out, application_id)?;
    write_utf8(out, secret)
}

/// Appends a log record exactly as a client would send it.
pub fn encode_log_record(
    out: &mut Vec<u8>,
    category: &str,
    level: LogLevel,
    message: &str,
) -> Result<(), EncodeError> {
    out.push(MessageTag::LogRecord.as_u8());
    write_utf8(out, category)?;
    out.extend_from_slice(&level.as_wire().to_be_bytes());
    write_utf8(out, message)
}
