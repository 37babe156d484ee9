//! Frame construction and decoding.
//!
//! A frame is the single unit of exchange on the bus: a fixed five-byte
//! header, an application payload and a one-byte checksum trailer. The first
//! four payload bytes conventionally carry a 32-bit message identifier in
//! big-endian order; both [`Frame`] and [`Message`] expose it explicitly
//! rather than leaving the convention to callers.

use heapless::Vec;

use crate::checksum::Checksum;
use crate::error::{Error, Result};
use crate::{
    FRAME_OVERHEAD, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, START_OF_DATA,
    START_OF_FRAME,
};

/// A complete frame as it appears on the wire.
pub type RawFrame = Vec<u8, MAX_FRAME_SIZE>;

/// Width of the message identifier conventionally leading the payload.
const MESSAGE_ID_SIZE: usize = 4;

/// The typed fixed-position header fields of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame size declared on the wire: payload length plus overhead.
    pub length: u8,
    /// Sender address.
    pub source: u8,
    /// Destination address.
    pub destination: u8,
}

impl FrameHeader {
    /// Parses and validates the header of a received frame.
    ///
    /// Checks the minimum length, both marker bytes, and that the LENGTH
    /// field matches the number of bytes actually received. This is the one
    /// place the six-byte minimum is enforced on the decode path.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < MIN_FRAME_SIZE {
            return Err(Error::FrameTooShort(buf.len()));
        }
        if buf[0] != START_OF_FRAME {
            return Err(Error::InvalidMarker {
                offset: 0,
                found: buf[0],
            });
        }
        if buf[4] != START_OF_DATA {
            return Err(Error::InvalidMarker {
                offset: 4,
                found: buf[4],
            });
        }

        let header = FrameHeader {
            length: buf[1],
            source: buf[2],
            destination: buf[3],
        };

        if header.length as usize != buf.len() {
            return Err(Error::LengthMismatch {
                declared: header.length as usize,
                received: buf.len(),
            });
        }

        Ok(header)
    }

    /// Returns the payload size described by the LENGTH field.
    pub const fn payload_len(&self) -> usize {
        (self.length as usize).saturating_sub(FRAME_OVERHEAD)
    }
}

/// An outgoing frame under construction.
///
/// Built via [`Frame::data`], [`Frame::data_with_id`] or [`Frame::ping`],
/// then serialized with [`Frame::encode`] or [`Frame::encode_to_vec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    source: u8,
    destination: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Creates a data frame carrying the payload bytes verbatim.
    pub fn data(source: u8, destination: u8, payload: &[u8]) -> Result<Self> {
        let mut buf = Vec::new();
        buf.extend_from_slice(payload)
            .map_err(|_| Error::PayloadTooLarge(payload.len()))?;

        Ok(Self {
            source,
            destination,
            payload: buf,
        })
    }

    /// Creates a data frame with an explicit message identifier.
    ///
    /// The identifier is serialized big-endian as the first four payload
    /// bytes, ahead of the given data.
    pub fn data_with_id(source: u8, destination: u8, id: u32, payload: &[u8]) -> Result<Self> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&id.to_be_bytes())
            .map_err(|_| Error::PayloadTooLarge(MESSAGE_ID_SIZE))?;
        buf.extend_from_slice(payload)
            .map_err(|_| Error::PayloadTooLarge(MESSAGE_ID_SIZE + payload.len()))?;

        Ok(Self {
            source,
            destination,
            payload: buf,
        })
    }

    /// Creates a zero-payload ping frame, used as a presence probe.
    pub fn ping(source: u8, destination: u8) -> Self {
        Self {
            source,
            destination,
            payload: Vec::new(),
        }
    }

    /// Returns the sender address.
    pub const fn source(&self) -> u8 {
        self.source
    }

    /// Returns the destination address.
    pub const fn destination(&self) -> u8 {
        self.destination
    }

    /// Returns the payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the message identifier, if the payload leads with one.
    ///
    /// The identifier is only a convention: it is present whenever the
    /// payload holds at least four bytes.
    pub fn message_id(&self) -> Option<u32> {
        read_message_id(&self.payload)
    }

    /// Returns the total size of this frame when serialized.
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Serializes the frame into the provided buffer.
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let total = self.wire_size();
        if buf.len() < total {
            return Err(Error::BufferOverflow);
        }

        buf[0] = START_OF_FRAME;
        buf[1] = total as u8;
        buf[2] = self.source;
        buf[3] = self.destination;
        buf[4] = START_OF_DATA;
        buf[5..total - 1].copy_from_slice(&self.payload);
        buf[total - 1] = Checksum::compute(&buf[..total - 1]);

        Ok(total)
    }

    /// Serializes the frame into a fixed-capacity byte vector.
    pub fn encode_to_vec(&self) -> Result<RawFrame> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buf)?;
        RawFrame::from_slice(&buf[..len]).map_err(|_| Error::BufferOverflow)
    }
}

/// A decoded incoming message.
///
/// Created fresh on each successful receive and owned by the caller; the
/// receive path retains nothing between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Sender address.
    pub source: u8,
    /// Destination address.
    pub destination: u8,
    /// Raw frame length in bytes, as received.
    pub length: usize,
    data: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Message {
    /// Decodes and validates a complete received frame.
    ///
    /// Validates the header via [`FrameHeader::parse`] and requires the byte
    /// sum over the whole frame to be zero modulo 256. A frame under six
    /// bytes is always rejected here, even when its checksum happens to be
    /// valid.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let header = FrameHeader::parse(buf)?;

        let sum = Checksum::sum_of(buf);
        if sum != 0 {
            return Err(Error::ChecksumMismatch(sum));
        }

        let data = Vec::from_slice(&buf[5..buf.len() - 1]).map_err(|_| Error::BufferOverflow)?;

        Ok(Self {
            source: header.source,
            destination: header.destination,
            length: buf.len(),
            data,
        })
    }

    /// Returns the full payload region, identifier included.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the message identifier, if the payload leads with one.
    pub fn message_id(&self) -> Option<u32> {
        read_message_id(&self.data)
    }

    /// Returns the payload bytes following the message identifier.
    ///
    /// When the payload region holds fewer than four bytes, no identifier is
    /// present and the whole region is returned.
    pub fn payload(&self) -> &[u8] {
        match self.message_id() {
            Some(_) => &self.data[MESSAGE_ID_SIZE..],
            None => &self.data,
        }
    }
}

/// Reads the conventional big-endian identifier from the payload head.
fn read_message_id(data: &[u8]) -> Option<u32> {
    let head: [u8; MESSAGE_ID_SIZE] = data.get(..MESSAGE_ID_SIZE)?.try_into().ok()?;
    Some(u32::from_be_bytes(head))
}
