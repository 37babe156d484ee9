//! Additive checksum used by the frame trailer.
//!
//! Every frame ends with a single byte chosen so that the sum of all bytes in
//! the frame is zero modulo 256. The trailer is the two's complement of the
//! running sum: bitwise complement plus one, reduced to eight bits.
//!
//! # Example
//!
//! ```rust,ignore
//! use xbus::Checksum;
//!
//! let data = [0x01, 0x06, 0x01, 0x05, 0x02];
//! let trailer = Checksum::compute(&data);
//! assert_eq!(trailer, 0xF1);
//! ```

/// Running sum-mod-256 checksum calculator.
///
/// Can be fed data in chunks via [`update`](Checksum::update); the one-shot
/// helpers cover the common whole-buffer cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checksum {
    sum: u8,
}

impl Checksum {
    /// Creates a new calculator with a zero sum.
    #[inline]
    pub const fn new() -> Self {
        Self { sum: 0 }
    }

    /// Adds the given bytes to the running sum.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.sum = self.sum.wrapping_add(byte);
        }
    }

    /// Returns the current sum modulo 256.
    #[inline]
    pub const fn sum(&self) -> u8 {
        self.sum
    }

    /// Returns the trailer byte: the two's complement of the current sum.
    ///
    /// Appending this byte makes the buffer sum to zero modulo 256.
    #[inline]
    pub const fn trailer(&self) -> u8 {
        (!self.sum).wrapping_add(1)
    }

    /// Computes the trailer byte for the given buffer in one call.
    #[inline]
    pub fn compute(data: &[u8]) -> u8 {
        let mut chk = Self::new();
        chk.update(data);
        chk.trailer()
    }

    /// Returns the sum of the given buffer modulo 256.
    #[inline]
    pub fn sum_of(data: &[u8]) -> u8 {
        let mut chk = Self::new();
        chk.update(data);
        chk.sum()
    }

    /// Returns true if the buffer, trailer included, sums to zero.
    #[inline]
    pub fn verify(data: &[u8]) -> bool {
        Self::sum_of(data) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailer_cancels_sum() {
        let data = [0x01u8, 0x08, 0x01, 0x02, 0x02, 0xAA, 0xBB];
        let trailer = Checksum::compute(&data);

        let mut chk = Checksum::new();
        chk.update(&data);
        chk.update(&[trailer]);
        assert_eq!(chk.sum(), 0);
    }

    #[test]
    fn test_trailer_cancels_any_sum() {
        // Every possible running sum must be cancelled by its trailer.
        for value in 0..=255u8 {
            let trailer = Checksum::compute(&[value]);
            assert!(Checksum::verify(&[value, trailer]), "value 0x{value:02x}");
        }
    }

    #[test]
    fn test_known_trailer() {
        // Ping frame header from address 0x01 to 0x05.
        let data = [0x01u8, 0x06, 0x01, 0x05, 0x02];
        assert_eq!(Checksum::compute(&data), 0xF1);
    }

    #[test]
    fn test_zero_sum_trailer_is_zero() {
        assert_eq!(Checksum::compute(&[0x80, 0x80]), 0);
        assert!(Checksum::verify(&[0x80, 0x80, 0x00]));
    }

    #[test]
    fn test_chunked_update_matches_oneshot() {
        let data = b"half-duplex bus traffic";
        let mut chk = Checksum::new();
        chk.update(&data[..7]);
        chk.update(&data[7..]);
        assert_eq!(chk.trailer(), Checksum::compute(data));
    }
}
