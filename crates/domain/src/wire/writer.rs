use bytes::{BufMut, Bytes, BytesMut};

use super::name::write_name;
use crate::errors::EncodeError;

/// Growable output buffer for one DNS message.
#[derive(Debug)]
pub(crate) struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    #[inline]
    pub(crate) fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    #[inline]
    pub(crate) fn put_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    #[inline]
    pub(crate) fn put_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    #[inline]
    pub(crate) fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub(crate) fn put_name(&mut self, name: &str) -> Result<(), EncodeError> {
        write_name(&mut self.buf, name)
    }

    /// Overwrites a big-endian u16 at `offset`, used for back-filled lengths.
    pub(crate) fn patch_u16(&mut self, offset: usize, value: u16) {
        self.buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}
