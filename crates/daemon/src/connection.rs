//! Decode-and-dispatch loop for one connection.
//!
//! Newly arrived bytes are appended to an accumulation buffer; the decoder
//! then drains as many complete messages as the buffer holds before the
//! next read. Message N+1 is never decoded before message N has been fully
//! handled, because handling may change the session's authentication state.
//! A malformed payload or an unrecognised tag stops processing immediately:
//! the error is logged and the function returns, which closes the
//! connection, with no further writes.

use std::io;
use std::time::Duration;

use protocol::{DecodeOutcome, decode_message, encode_message};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::session::Session;

/// Size of each read from the transport, matching the original server's
/// reader buffer.
const READ_CHUNK: usize = 1024;

/// Runs one connection to completion.
///
/// Returns `Ok(())` when the peer closes the stream or when the protocol
/// requires the server to drop the connection (malformed input,
/// unrecognised tag). Transport failures and a `read_timeout` expiry
/// surface as errors.
pub async fn drive_connection<S>(
    stream: S,
    mut session: Session,
    read_timeout: Duration,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut inbox: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        loop {
            match decode_message(&inbox) {
                DecodeOutcome::Message { message, consumed } => {
                    tracing::trace!(?message, consumed, "decoded inbound message");
                    inbox.drain(..consumed);
                    if let Some(response) = session.handle(message) {
                        let mut bytes = Vec::new();
                        encode_message(&response, &mut bytes);
                        writer.write_all(&bytes).await?;
                        writer.flush().await?;
                    }
                }
                DecodeOutcome::Incomplete => break,
                DecodeOutcome::Malformed(error) => {
                    tracing::error!(%error, "closing connection on malformed message");
                    return Ok(());
                }
                DecodeOutcome::UnrecognizedTag(byte) => {
                    tracing::error!(
                        byte = format!("0x{byte:02x}"),
                        "closing connection on unrecognized message tag"
                    );
                    return Ok(());
                }
            }
        }

        let read = timeout(read_timeout, reader.read(&mut chunk))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "session read timed out"))??;
        if read == 0 {
            tracing::debug!("peer closed the connection");
            return Ok(());
        }
        inbox.extend_from_slice(&chunk[..read]);
    }
}
