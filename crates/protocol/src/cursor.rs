//! Position-tracking view over the unconsumed bytes of a connection.
//!
//! The frame decoder retries a whole-message decode from scratch every time
//! more bytes arrive, so a read that runs out of data must leave no trace.
//! [`Cursor`] enforces that by checking availability before consuming
//! anything: a failed read returns [`Incomplete`] with the position exactly
//! where it was. Multi-field reads that need to unwind more than one step
//! combine [`Cursor::mark`] and [`Cursor::reset_to`].

use crate::error::Incomplete;

/// Read cursor over a byte slice with mark/reset support.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `buf`.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the number of bytes consumed so far.
    #[must_use]
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes still available.
    #[must_use]
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Records the current position so a later [`Cursor::reset_to`] can
    /// unwind a partially applied multi-field read.
    #[must_use]
    #[inline]
    pub const fn mark(&self) -> usize {
        self.pos
    }

    /// Rewinds to a position previously obtained from [`Cursor::mark`].
    #[inline]
    pub fn reset_to(&mut self, mark: usize) {
        debug_assert!(mark <= self.pos);
        self.pos = mark;
    }

    /// Returns the next byte without consuming it, or `None` at end of
    /// input.
    #[must_use]
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Consumes one byte and returns it as an unsigned value.
    pub fn read_u8(&mut self) -> Result<u8, Incomplete> {
        let byte = self.buf.get(self.pos).copied().ok_or(Incomplete)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Consumes two bytes as a big-endian unsigned 16-bit integer.
    ///
    /// Used for the length prefix of UTF-8 string fields.
    pub fn read_u16(&mut self) -> Result<u16, Incomplete> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Consumes four bytes as a big-endian two's-complement 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32, Incomplete> {
        let bytes = self.read_exact(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consumes exactly `len` bytes and returns them as a borrowed slice.
    ///
    /// Consumes nothing when fewer than `len` bytes remain.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], Incomplete> {
        if self.remaining() < len {
            return Err(Incomplete);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }
}
