//! # XBus - A Serial Bus Framing Protocol
//!
//! XBus is a `no_std` compatible point-to-point framing and checksum protocol
//! for addressed devices sharing a half-duplex serial bus (RS485 and similar).
//! It provides:
//!
//! - **Frame construction**: data frames and zero-payload ping frames
//! - **Payload serialization**: big-endian words, word sequences, NUL-terminated text
//! - **Checksum trailer**: sum-mod-256 two's complement, so every valid frame sums to zero
//! - **Validated receive**: length, marker and checksum checks with typed decode errors
//! - **Custom transport support**: works with any byte transport implementing [`Transport`]
//!
//! ## Wire Format
//!
//! ```text
//! ┌───────┬────────┬─────┬─────┬────────┬────────────┬──────────┐
//! │ START │ LENGTH │ SRC │ DST │ START2 │ PAYLOAD    │ CHECKSUM │
//! │ 0x01  │ 1B     │ 1B  │ 1B  │ 0x02   │ 0-249B     │ 1B       │
//! └───────┴────────┴─────┴─────┴────────┴────────────┴──────────┘
//! ```
//!
//! LENGTH is the payload size plus the fixed six bytes of overhead, so it
//! equals the total frame size. The checksum trailer is chosen so that the sum
//! of every byte in the frame is zero modulo 256.
//!
//! ## Example
//!
//! ```rust,ignore
//! use core::time::Duration;
//! use xbus::{Protocol, transport::LoopbackTransport};
//!
//! let transport = LoopbackTransport::<512>::new();
//! let mut node = Protocol::new(transport, 0x01);
//!
//! node.send(0x02, &[0xAA, 0xBB])?;
//! let message = node.receive(Duration::from_millis(20))?;
//! assert_eq!(message.destination, 0x02);
//! ```
//!
//! The layer guarantees only that a syntactically valid, checksum-correct
//! frame was either produced or rejected. Delivery, ordering, retransmission
//! and flow control are left to the application.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod checksum;
pub mod error;
pub mod frame;
pub mod payload;
pub mod protocol;
pub mod transport;

// Re-export commonly used types
pub use checksum::Checksum;
pub use error::{Error, Result};
pub use frame::{Frame, FrameHeader, Message, RawFrame};
pub use payload::PayloadBuf;
pub use protocol::Protocol;
pub use transport::Transport;

/// Start-of-frame marker, first byte of every frame.
pub const START_OF_FRAME: u8 = 0x01;

/// Start-of-data marker, placed between the header and the payload.
pub const START_OF_DATA: u8 = 0x02;

/// Fixed per-frame overhead: four header bytes, the data marker and the
/// checksum trailer.
pub const FRAME_OVERHEAD: usize = 6;

/// Smallest possible frame: a ping with an empty payload.
pub const MIN_FRAME_SIZE: usize = FRAME_OVERHEAD;

/// Largest frame the one-byte LENGTH field can describe.
pub const MAX_FRAME_SIZE: usize = 255;

/// Largest payload that fits in a frame.
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - FRAME_OVERHEAD;
