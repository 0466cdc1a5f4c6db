//! Bounded, growable byte buffer for outgoing netlink messages.

use bytes::{BufMut, BytesMut};

use super::error::{Error, Result};

/// Default upper bound for one request.
///
/// Requests built by these tools are a header, one fixed body and at most a
/// couple of attributes, so 2 KiB leaves plenty of headroom.
pub const DEFAULT_LIMIT: usize = 2048;

/// Byte buffer with a hard size limit.
///
/// Storage is reserved up front and grows on demand, but any write that
/// would take the buffer past `limit` fails with [`Error::BufferOverflow`]
/// and leaves the contents untouched.
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    buf: BytesMut,
    limit: usize,
}

impl MessageBuffer {
    /// Create an empty buffer bounded by [`DEFAULT_LIMIT`].
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Create an empty buffer bounded by `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(limit),
            limit,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The size limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.buf.len()
    }

    /// Fail unless `needed` more bytes fit.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::BufferOverflow {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Append bytes verbatim.
    pub fn put_slice(&mut self, data: &[u8]) -> Result<()> {
        self.ensure(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Append `count` zero bytes.
    pub fn put_zeroes(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.buf.put_bytes(0, count);
        Ok(())
    }

    /// Overwrite a native-endian u16 at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 2` is past the written length.
    pub fn set_u16(&mut self, offset: usize, value: u16) {
        self.buf[offset..offset + 2].copy_from_slice(&value.to_ne_bytes());
    }

    /// Overwrite a native-endian u32 at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 4` is past the written length.
    pub fn set_u32(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }

    /// Get the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the buffer, returning the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}
