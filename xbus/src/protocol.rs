//! Protocol node: the main send/receive API.

use core::time::Duration;

use crate::checksum::Checksum;
use crate::error::{Error, Result};
use crate::frame::{Frame, Message, RawFrame};
use crate::payload::PayloadBuf;
use crate::transport::Transport;
use crate::{MAX_FRAME_SIZE, MIN_FRAME_SIZE};

/// A protocol node bound to one bus address and one transport.
///
/// Every operation is a direct, blocking call into the transport; the node
/// keeps no state between calls besides its own address. One instance is
/// meant to be driven by exactly one logical thread of control.
///
/// # Example
///
/// ```rust,ignore
/// use core::time::Duration;
/// use xbus::{Protocol, transport::LoopbackTransport};
///
/// let mut node = Protocol::new(LoopbackTransport::<512>::new(), 0x01);
/// node.ping(0x05)?;
/// let message = node.receive(Duration::from_millis(20))?;
/// ```
pub struct Protocol<T> {
    transport: T,
    address: u8,
}

impl<T: Transport> Protocol<T> {
    /// Creates a node with the given transport and local bus address.
    ///
    /// Both are fixed for the lifetime of the node.
    pub fn new(transport: T, address: u8) -> Self {
        Self { transport, address }
    }

    /// Returns the local bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the node and returns the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Sends a data frame with the payload bytes verbatim.
    pub fn send(&mut self, destination: u8, payload: &[u8]) -> Result<()> {
        self.write_frame(&Frame::data(self.address, destination, payload)?)
    }

    /// Sends a data frame led by an explicit big-endian message identifier.
    pub fn send_with_id(&mut self, destination: u8, id: u32, payload: &[u8]) -> Result<()> {
        self.write_frame(&Frame::data_with_id(self.address, destination, id, payload)?)
    }

    /// Sends a single 32-bit word, big-endian.
    pub fn send_word(&mut self, destination: u8, value: u32) -> Result<()> {
        let mut payload = PayloadBuf::new();
        payload.push_u32(value)?;
        self.send(destination, payload.as_slice())
    }

    /// Sends a sequence of 32-bit words, each big-endian, in order.
    pub fn send_words(&mut self, destination: u8, values: &[u32]) -> Result<()> {
        let mut payload = PayloadBuf::new();
        payload.push_u32s(values)?;
        self.send(destination, payload.as_slice())
    }

    /// Sends text as one byte per input byte with a zero terminator.
    pub fn send_str(&mut self, destination: u8, text: &str) -> Result<()> {
        let mut payload = PayloadBuf::new();
        payload.push_str(text)?;
        self.send(destination, payload.as_slice())
    }

    /// Sends a zero-payload ping frame to probe for a destination.
    pub fn ping(&mut self, destination: u8) -> Result<()> {
        self.write_frame(&Frame::ping(self.address, destination))
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let raw = frame.encode_to_vec()?;
        self.transport.write(&raw)?;

        log::trace!(
            "sent frame dst=0x{:02x} len={}",
            frame.destination(),
            raw.len()
        );
        Ok(())
    }

    /// Reads one raw frame and validates it without decoding.
    ///
    /// Fails with [`Error::FrameTooShort`] if fewer than six bytes arrived
    /// and with [`Error::ChecksumMismatch`] if the bytes do not sum to zero
    /// modulo 256. On success the bytes are returned unmodified.
    pub fn receive_raw(&mut self, timeout: Duration) -> Result<RawFrame> {
        let mut scratch = [0u8; MAX_FRAME_SIZE];
        let n = self.transport.read(&mut scratch, timeout)?;

        if n < MIN_FRAME_SIZE {
            return Err(Error::FrameTooShort(n));
        }

        let sum = Checksum::sum_of(&scratch[..n]);
        if sum != 0 {
            return Err(Error::ChecksumMismatch(sum));
        }

        RawFrame::from_slice(&scratch[..n]).map_err(|_| Error::BufferOverflow)
    }

    /// Reads once from the transport and appends the bytes to `buf`.
    ///
    /// Only the checksum over the newly read bytes is validated here; an
    /// empty read passes, and length rules are left to the decode step.
    /// This is the primitive underneath [`receive`](Protocol::receive).
    pub fn read_into(&mut self, buf: &mut RawFrame, timeout: Duration) -> Result<()> {
        let mut scratch = [0u8; MAX_FRAME_SIZE];
        let n = self.transport.read(&mut scratch, timeout)?;

        buf.extend_from_slice(&scratch[..n])
            .map_err(|_| Error::BufferOverflow)?;

        let sum = Checksum::sum_of(&scratch[..n]);
        if sum != 0 {
            return Err(Error::ChecksumMismatch(sum));
        }
        Ok(())
    }

    /// Receives and decodes one message.
    ///
    /// Fails with [`Error::Timeout`] when nothing at all arrived before the
    /// deadline; any other malformation surfaces as the corresponding decode
    /// error. The decoded message is returned to the caller and not retained.
    pub fn receive(&mut self, timeout: Duration) -> Result<Message> {
        let mut buf = RawFrame::new();
        self.read_into(&mut buf, timeout)?;

        if buf.is_empty() {
            log::trace!("receive deadline elapsed with no bytes");
            return Err(Error::Timeout);
        }

        let message = Message::decode(&buf)?;
        log::debug!(
            "received frame src=0x{:02x} dst=0x{:02x} len={}",
            message.source,
            message.destination,
            message.length
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{LoopbackTransport, NullTransport};

    const TIMEOUT: Duration = Duration::from_millis(10);

    fn loopback_node() -> Protocol<LoopbackTransport<512>> {
        Protocol::new(LoopbackTransport::new(), 0x01)
    }

    #[test]
    fn test_send_then_receive() {
        let mut node = loopback_node();
        node.send(0x02, &[0xAA, 0xBB]).unwrap();

        let message = node.receive(TIMEOUT).unwrap();
        assert_eq!(message.source, 0x01);
        assert_eq!(message.destination, 0x02);
        assert_eq!(message.length, 8);
        assert_eq!(message.data(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_ping_then_receive() {
        let mut node = loopback_node();
        node.ping(0x05).unwrap();

        assert_eq!(node.transport().available(), 6);
        let message = node.receive(TIMEOUT).unwrap();
        assert_eq!(message.destination, 0x05);
        assert_eq!(message.message_id(), None);
        assert!(message.data().is_empty());
    }

    #[test]
    fn test_send_with_id() {
        let mut node = loopback_node();
        node.send_with_id(0x03, 0x0000_BEEF, b"hi").unwrap();

        let message = node.receive(TIMEOUT).unwrap();
        assert_eq!(message.message_id(), Some(0x0000_BEEF));
        assert_eq!(message.payload(), b"hi");
    }

    #[test]
    fn test_send_word_and_words() {
        let mut node = loopback_node();
        node.send_word(0x02, 0x1122_3344).unwrap();
        let message = node.receive(TIMEOUT).unwrap();
        assert_eq!(message.data(), &[0x11, 0x22, 0x33, 0x44]);

        node.send_words(0x02, &[1, 2]).unwrap();
        let message = node.receive(TIMEOUT).unwrap();
        assert_eq!(message.data(), &[0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_send_str() {
        let mut node = loopback_node();
        node.send_str(0x02, "ok").unwrap();

        let message = node.receive(TIMEOUT).unwrap();
        assert_eq!(message.data(), &[b'o', b'k', 0x00]);
    }

    #[test]
    fn test_receive_timeout() {
        let mut node = Protocol::new(NullTransport::new(), 0x01);
        assert_eq!(node.receive(TIMEOUT), Err(Error::Timeout));
    }

    #[test]
    fn test_receive_raw_valid() {
        let mut node = loopback_node();
        node.send(0x02, &[0x10, 0x20]).unwrap();

        let raw = node.receive_raw(TIMEOUT).unwrap();
        assert_eq!(raw.len(), 8);
        assert_eq!(Checksum::sum_of(&raw), 0);
    }

    #[test]
    fn test_receive_raw_too_short() {
        let mut node = loopback_node();
        // Checksum-valid but under the minimum: length wins.
        node.transport_mut().write(&[0x01, 0x02, 0xFD]).unwrap();
        assert_eq!(node.receive_raw(TIMEOUT), Err(Error::FrameTooShort(3)));
    }

    #[test]
    fn test_receive_raw_bad_checksum() {
        let mut node = loopback_node();
        node.transport_mut()
            .write(&[0x01, 0x06, 0x01, 0x05, 0x02, 0x00])
            .unwrap();

        assert_eq!(node.receive_raw(TIMEOUT), Err(Error::ChecksumMismatch(0x0F)));
    }

    #[test]
    fn test_receive_corrupted_frame() {
        let mut node = loopback_node();
        let mut raw = Frame::data(0x01, 0x02, &[0xAA]).unwrap().encode_to_vec().unwrap();
        raw[5] ^= 0xFF;
        node.transport_mut().write(&raw).unwrap();

        assert!(matches!(
            node.receive(TIMEOUT),
            Err(Error::ChecksumMismatch(_))
        ));
    }

    #[test]
    fn test_receive_short_checksum_valid_buffer() {
        // The accumulate step passes a sum-zero runt; the decode step is the
        // single point that rejects it.
        let mut node = loopback_node();
        node.transport_mut().write(&[0x01, 0x02, 0xFD]).unwrap();

        assert_eq!(node.receive(TIMEOUT), Err(Error::FrameTooShort(3)));
    }

    #[test]
    fn test_read_into_accumulates() {
        let mut node = loopback_node();
        node.send(0x02, &[0x42]).unwrap();

        let mut buf = RawFrame::new();
        node.read_into(&mut buf, TIMEOUT).unwrap();
        assert_eq!(buf.len(), 7);

        // A second read appends nothing and still passes.
        node.read_into(&mut buf, TIMEOUT).unwrap();
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_no_state_between_receives() {
        let mut node = loopback_node();
        node.send(0x02, &[0x01]).unwrap();
        let first = node.receive(TIMEOUT).unwrap();

        node.send(0x03, &[0x02]).unwrap();
        let second = node.receive(TIMEOUT).unwrap();

        assert_eq!(first.destination, 0x02);
        assert_eq!(second.destination, 0x03);
        assert_ne!(first, second);
    }
}
