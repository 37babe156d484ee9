//! Error types for the protocol.

use core::fmt;

/// Errors surfaced by frame construction, transmission and receive paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A received frame was shorter than the six-byte minimum.
    FrameTooShort(usize),

    /// A fixed marker byte (start-of-frame or start-of-data) was wrong.
    InvalidMarker {
        /// Offset of the marker within the frame.
        offset: usize,
        /// The byte actually found there.
        found: u8,
    },

    /// The LENGTH field disagrees with the number of bytes received.
    LengthMismatch {
        /// Frame size declared by the LENGTH field.
        declared: usize,
        /// Bytes actually received.
        received: usize,
    },

    /// The received bytes did not sum to zero modulo 256; carries the
    /// computed sum for diagnostics.
    ChecksumMismatch(u8),

    /// No frame arrived before the deadline elapsed.
    Timeout,

    /// Payload larger than the one-byte LENGTH field can describe.
    PayloadTooLarge(usize),

    /// A fixed-capacity buffer could not hold the data.
    BufferOverflow,

    /// Transport-level read or write failure.
    Io,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FrameTooShort(len) => {
                write!(f, "frame too short: {len} bytes, minimum is 6")
            }
            Error::InvalidMarker { offset, found } => {
                write!(f, "invalid marker byte 0x{found:02x} at offset {offset}")
            }
            Error::LengthMismatch { declared, received } => {
                write!(
                    f,
                    "length field declares {declared} bytes but {received} were received"
                )
            }
            Error::ChecksumMismatch(sum) => {
                write!(f, "checksum mismatch, frame sums to 0x{sum:02x}")
            }
            Error::Timeout => write!(f, "no frame received before the deadline"),
            Error::PayloadTooLarge(len) => {
                write!(f, "payload of {len} bytes exceeds the frame capacity")
            }
            Error::BufferOverflow => write!(f, "buffer too small for the data"),
            Error::Io => write!(f, "transport I/O failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(err: Error) -> std::io::Error {
        let kind = match err {
            Error::Timeout => std::io::ErrorKind::TimedOut,
            Error::FrameTooShort(_) => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
