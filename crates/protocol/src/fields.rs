//! Length-prefixed UTF-8 string fields.
//!
//! ActionScript's `Socket.writeUTF` emits a 16-bit unsigned big-endian byte
//! length followed by UTF-8 payload. Deployed clients occasionally ship
//! broken encoders, so decoding must never fail on bad UTF-8: the strict
//! pass is attempted first, and on failure the same bytes are re-decoded
//! with every malformed subsequence collapsed to a single space, with a
//! warning logged. The second pass is total.

use crate::cursor::Cursor;
use crate::error::{EncodeError, Incomplete};

/// Reads a length-prefixed UTF-8 string field.
///
/// Returns [`Incomplete`] with the cursor fully rewound (length prefix
/// included) when fewer payload bytes are available than the prefix claims.
pub fn read_utf8(cursor: &mut Cursor<'_>) -> Result<String, Incomplete> {
    let mark = cursor.mark();
    let len = usize::from(cursor.read_u16()?);
    match cursor.read_exact(len) {
        Ok(bytes) => Ok(decode_lossy(bytes)),
        Err(incomplete) => {
            cursor.reset_to(mark);
            Err(incomplete)
        }
    }
}

/// Appends a length-prefixed UTF-8 string field to `out`.
///
/// # Errors
///
/// Returns [`EncodeError::StringTooLong`] when the string's byte length does
/// not fit the 16-bit prefix.
pub fn write_utf8(out: &mut Vec<u8>, value: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(value.len())
        .map_err(|_| EncodeError::StringTooLong { len: value.len() })?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Decodes `bytes` as UTF-8, substituting a single space for each malformed
/// subsequence. Never fails.
fn decode_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(valid) => valid.to_owned(),
        Err(_) => {
            tracing::warn!(
                len = bytes.len(),
                "invalid UTF-8 in string field, replacing malformed sequences with spaces"
            );
            substitute_malformed(bytes)
        }
    }
}

/// Second decoding pass: walk the input, copying valid runs verbatim and
/// emitting one space per malformed subsequence.
fn substitute_malformed(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(error) => {
                let valid_up_to = error.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&rest[..valid_up_to]) {
                    out.push_str(valid);
                }
                out.push(' ');
                // error_len() is None only when the malformed sequence is
                // truncated by the end of input.
                let skip = error.error_len().unwrap_or(rest.len() - valid_up_to);
                rest = &rest[valid_up_to + skip..];
            }
        }
    }
    out
}
