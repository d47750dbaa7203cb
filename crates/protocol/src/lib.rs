#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Wire protocol for the SLF4Fx remote-logging service. A client opens a
//! persistent TCP connection, authenticates with an application-id/secret
//! pair, and streams structured log records that the server forwards to a
//! logging sink. A second, unauthenticated request answers the legacy Flash
//! cross-domain policy handshake.
//!
//! This crate owns the byte-exact framing: turning the accumulated bytes of a
//! connection into typed messages while tolerating partial arrivals, and
//! serialising responses back onto the wire. It performs no I/O; all routines
//! operate on in-memory byte slices so any transport that can append incoming
//! bytes to a buffer can drive the decoder.
//!
//! # Design
//!
//! - [`Cursor`] tracks a read position over the unconsumed bytes and rewinds
//!   fully whenever a read runs out of data, so a retried decode observes the
//!   exact same prefix.
//! - [`decode_message`] peeks the leading tag byte and dispatches to the one
//!   matching message decoder. The result is a [`DecodeOutcome`] that keeps
//!   the three failure shapes distinct: not enough bytes yet, a recognised
//!   tag with a broken payload, and an unrecognised tag byte. Only the first
//!   is recoverable.
//! - [`encode_message`] serialises outbound messages. The access response
//!   carries a leading tag byte; the policy response is raw text terminated
//!   by a single NUL and deliberately has no tag.
//!
//! # Examples
//!
//! Decode an access request that arrives in one piece:
//!
//! ```
//! use protocol::{decode_message, DecodeOutcome, InboundMessage};
//!
//! let bytes = [
//!     0x01, // access request tag
//!     0x00, 0x03, b'a', b'p', b'p', // application id
//!     0x00, 0x03, b's', b'e', b'c', // secret
//! ];
//!
//! match decode_message(&bytes) {
//!     DecodeOutcome::Message { message, consumed } => {
//!         assert_eq!(consumed, bytes.len());
//!         assert!(matches!(message, InboundMessage::AccessRequest { .. }));
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod cursor;
mod decoder;
mod encoder;
mod error;
mod fields;
mod message;

pub use cursor::Cursor;
pub use decoder::{DecodeOutcome, decode_message};
pub use encoder::{encode_access_request, encode_log_record, encode_message};
pub use error::{DecodeError, EncodeError, Incomplete};
pub use fields::{read_utf8, write_utf8};
pub use message::{
    InboundMessage, LogLevel, MessageTag, OutboundMessage, POLICY_FILE_REQUEST,
};
