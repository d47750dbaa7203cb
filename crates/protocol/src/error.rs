//! Failure taxonomy for the wire codec.
//!
//! The protocol distinguishes three ways a decode can stop short of a
//! message. Running out of bytes is expected during normal operation and is
//! represented by the standalone [`Incomplete`] marker rather than an error
//! variant, because the caller's reaction (wait for more bytes, retry the
//! exact same decode) differs fundamentally from the fatal cases collected
//! in [`DecodeError`].

use thiserror::Error;

/// Signal that the buffer does not yet hold enough bytes for the attempted
/// read.
///
/// Not a protocol violation: the connection stays open and the decode is
/// retried verbatim once more bytes arrive. Every codec routine that returns
/// `Err(Incomplete)` guarantees the cursor position is unchanged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Incomplete;

impl std::fmt::Display for Incomplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("not enough bytes buffered to complete the read")
    }
}

/// Fatal decode failures that require closing the connection.
///
/// Once either variant is observed, trust in the byte alignment of the
/// stream is lost and no further input from the peer may be interpreted.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DecodeError {
    /// The leading byte matched a known tag but the payload violated that
    /// message's format.
    #[error("malformed message payload: {reason}")]
    Malformed {
        /// Human-readable description of the violated constraint.
        reason: &'static str,
    },
    /// The leading byte matched no known inbound message tag.
    #[error("unrecognized message tag byte 0x{0:02x}")]
    UnrecognizedTag(u8),
}

/// Failures encountered while serialising messages to bytes.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EncodeError {
    /// A string field exceeded the 16-bit length prefix.
    #[error("string field of {len} bytes exceeds the {max}-byte wire limit", max = u16::MAX)]
    StringTooLong {
        /// Byte length of the offending string.
        len: usize,
    },
}
