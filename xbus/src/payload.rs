//! Payload serialization helpers.
//!
//! Payload content is application defined; this module covers the encodings
//! the bus peers conventionally share: 32-bit words in big-endian order and
//! NUL-terminated text.

use heapless::Vec;

use crate::error::{Error, Result};
use crate::MAX_PAYLOAD_SIZE;

/// A payload under construction.
///
/// Accumulates serialized values up to the frame payload capacity. The
/// finished bytes are handed to [`Protocol::send`](crate::Protocol::send) or
/// [`Frame::data`](crate::Frame::data).
#[derive(Debug, Clone, Default)]
pub struct PayloadBuf {
    buf: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl PayloadBuf {
    /// Creates an empty payload.
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends a 32-bit word, most significant byte first.
    pub fn push_u32(&mut self, value: u32) -> Result<()> {
        self.push_bytes(&value.to_be_bytes())
    }

    /// Appends a sequence of 32-bit words, each big-endian, preserving order.
    pub fn push_u32s(&mut self, values: &[u32]) -> Result<()> {
        for &value in values {
            self.push_u32(value)?;
        }
        Ok(())
    }

    /// Appends text as one byte per input byte, followed by a zero terminator.
    pub fn push_str(&mut self, text: &str) -> Result<()> {
        self.push_bytes(text.as_bytes())?;
        self.push_bytes(&[0])
    }

    /// Appends raw bytes verbatim.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| Error::PayloadTooLarge(self.buf.len() + bytes.len()))
    }

    /// Returns the serialized bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the current payload length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been serialized yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards all serialized bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_big_endian() {
        let mut payload = PayloadBuf::new();
        payload.push_u32(0xDEAD_BEEF).unwrap();
        assert_eq!(payload.as_slice(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_u32_roundtrip() {
        for value in [0u32, 1, 0xFF, 0x1234_5678, u32::MAX, 0x8000_0000] {
            let mut payload = PayloadBuf::new();
            payload.push_u32(value).unwrap();

            let bytes: [u8; 4] = payload.as_slice().try_into().unwrap();
            assert_eq!(u32::from_be_bytes(bytes), value);
        }
    }

    #[test]
    fn test_word_sequence_preserves_order() {
        let mut payload = PayloadBuf::new();
        payload.push_u32s(&[0x0000_0001, 0xAABB_CCDD]).unwrap();
        assert_eq!(
            payload.as_slice(),
            &[0x00, 0x00, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD]
        );
    }

    #[test]
    fn test_str_is_nul_terminated() {
        let mut payload = PayloadBuf::new();
        payload.push_str("ok").unwrap();
        assert_eq!(payload.as_slice(), &[b'o', b'k', 0x00]);
    }

    #[test]
    fn test_capacity_limit() {
        let mut payload = PayloadBuf::new();
        payload.push_bytes(&[0u8; MAX_PAYLOAD_SIZE]).unwrap();
        assert_eq!(payload.len(), MAX_PAYLOAD_SIZE);

        let err = payload.push_bytes(&[0]).unwrap_err();
        assert_eq!(err, Error::PayloadTooLarge(MAX_PAYLOAD_SIZE + 1));
    }
}
