//! Transport layer abstraction.
//!
//! The protocol never touches a bus directly; it drives anything that
//! implements the [`Transport`] trait. The bus side of the contract is
//! simple: `write` puts bytes on the wire, `read` blocks for at most the
//! given deadline and hands back whatever arrived, possibly nothing.
//!
//! # Implementations
//!
//! - [`LoopbackTransport`]: in-memory loopback, reads back its own writes
//! - [`NullTransport`]: discards writes, never receives
//! - [`UnixTransport`]: Unix domain socket bus simulation (requires `std`)

use core::time::Duration;

use crate::error::{Error, Result};

/// Transport trait for reading and writing raw bytes.
///
/// Implementations are synchronous and blocking; deadline enforcement is
/// entirely their responsibility. Failure modes of the underlying bus are
/// collapsed into [`Error::Io`].
pub trait Transport {
    /// Transmits the given bytes on the bus.
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Reads whatever bytes arrive within `timeout` into the buffer.
    ///
    /// Returns the number of bytes read. Zero means nothing arrived before
    /// the deadline; the call must never block indefinitely.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;
}

/// A loopback transport for testing.
///
/// Data written is immediately available to be read back; the read deadline
/// is irrelevant because data is either queued or absent.
#[derive(Debug, Default)]
pub struct LoopbackTransport<const N: usize> {
    queue: heapless::Deque<u8, N>,
}

impl<const N: usize> LoopbackTransport<N> {
    /// Creates a new loopback transport with the given queue capacity.
    pub fn new() -> Self {
        Self {
            queue: heapless::Deque::new(),
        }
    }

    /// Returns the number of bytes queued for reading.
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Drops all queued bytes.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<const N: usize> Transport for LoopbackTransport<N> {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        for &byte in buf {
            self.queue.push_back(byte).map_err(|_| Error::BufferOverflow)?;
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.queue.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

/// A null transport that discards all writes and never receives.
///
/// Useful for exercising the timeout path and measuring overhead.
#[derive(Debug, Default)]
pub struct NullTransport {
    bytes_written: usize,
}

impl NullTransport {
    /// Creates a new null transport.
    pub fn new() -> Self {
        Self { bytes_written: 0 }
    }

    /// Returns the total number of bytes written.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl Transport for NullTransport {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.bytes_written += buf.len();
        Ok(())
    }

    fn read(&mut self, _buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        Ok(0)
    }
}

/// A Unix domain socket transport.
///
/// Simulates the bus for host-side testing and demos. The per-call deadline
/// is mapped onto the socket's read timeout; an expired deadline reads as
/// zero bytes, not as an error.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct UnixTransport {
    stream: std::os::unix::net::UnixStream,
}

#[cfg(feature = "std")]
impl UnixTransport {
    /// Wraps an already connected stream.
    pub fn new(stream: std::os::unix::net::UnixStream) -> Self {
        Self { stream }
    }

    /// Connects to the socket at the given path.
    pub fn connect(path: &str) -> std::io::Result<Self> {
        Ok(Self {
            stream: std::os::unix::net::UnixStream::connect(path)?,
        })
    }

    /// Returns a reference to the inner stream.
    pub fn inner(&self) -> &std::os::unix::net::UnixStream {
        &self.stream
    }
}

#[cfg(feature = "std")]
impl Transport for UnixTransport {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        std::io::Write::write_all(&mut self.stream, buf).map_err(|_| Error::Io)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        if timeout.is_zero() {
            return Ok(0);
        }
        self.stream
            .set_read_timeout(Some(timeout))
            .map_err(|_| Error::Io)?;

        match std::io::Read::read(&mut self.stream, buf) {
            Ok(n) => Ok(n),
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(0)
            }
            Err(_) => Err(Error::Io),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback() {
        let mut transport: LoopbackTransport<64> = LoopbackTransport::new();

        let data = [0x01, 0x06, 0x00, 0x02, 0x02, 0xF5];
        transport.write(&data).unwrap();
        assert_eq!(transport.available(), data.len());

        let mut buf = [0u8; 32];
        let n = transport.read(&mut buf, Duration::from_millis(1)).unwrap();
        assert_eq!(&buf[..n], &data);
        assert_eq!(transport.available(), 0);
    }

    #[test]
    fn test_loopback_empty_read() {
        let mut transport: LoopbackTransport<16> = LoopbackTransport::new();
        let mut buf = [0u8; 8];
        assert_eq!(transport.read(&mut buf, Duration::from_millis(1)).unwrap(), 0);
    }

    #[test]
    fn test_loopback_overflow() {
        let mut transport: LoopbackTransport<4> = LoopbackTransport::new();
        let result = transport.write(&[0u8; 5]);
        assert_eq!(result, Err(Error::BufferOverflow));
    }

    #[test]
    fn test_null_transport() {
        let mut transport = NullTransport::new();
        transport.write(&[1, 2, 3]).unwrap();
        assert_eq!(transport.bytes_written(), 3);

        let mut buf = [0u8; 8];
        assert_eq!(transport.read(&mut buf, Duration::from_millis(1)).unwrap(), 0);
    }
}
