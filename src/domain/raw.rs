//! Raw sensor samples
//!
//! The HTU21D returns each measurement as two bytes: eight MSBs followed by
//! an LSB byte whose two low bits are status bits. Only 14 bits carry data.

/// Number of data bits in a raw sample
pub const RAW_BITS: u32 = 14;

/// Full-scale divisor for the conversion formulas (2^14)
pub const RAW_FULL_SCALE: f32 = (1u32 << RAW_BITS) as f32;

/// Largest value a 14-bit sample can take
pub const RAW_MAX: u16 = (1 << RAW_BITS) - 1;

/// Assemble a 14-bit value from the MSB and LSB bytes of a reading.
///
/// `(msb << 6) | (lsb >> 2)`: the LSB's two status bits are discarded.
#[inline]
pub const fn assemble_raw14(msb: u8, lsb: u8) -> u16 {
    ((msb as u16) << 6) | ((lsb as u16) >> 2)
}

/// A 14-bit raw sample as delivered by the sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample(u16);

impl RawSample {
    /// Build a sample from the two received bytes
    pub const fn from_bytes(msb: u8, lsb: u8) -> Self {
        Self(assemble_raw14(msb, lsb))
    }

    /// Wrap an already assembled value.
    ///
    /// No range check is done; values above [`RAW_MAX`] convert to
    /// out-of-range physical values.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl From<RawSample> for u16 {
    fn from(sample: RawSample) -> Self {
        sample.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_reference_bytes() {
        assert_eq!(assemble_raw14(0x40, 0x80), 0x1020);
        assert_eq!(assemble_raw14(0x40, 0x80), 4128);
    }

    #[test]
    fn test_status_bits_are_dropped() {
        assert_eq!(assemble_raw14(0x00, 0x03), 0);
        assert_eq!(assemble_raw14(0x00, 0x07), 1);
    }

    #[test]
    fn test_never_exceeds_14_bits() {
        assert_eq!(assemble_raw14(0xFF, 0xFF), RAW_MAX);
        for msb in [0x00u8, 0x01, 0x7F, 0x80, 0xFE, 0xFF] {
            for lsb in [0x00u8, 0x04, 0x80, 0xFC, 0xFF] {
                assert!(assemble_raw14(msb, lsb) <= RAW_MAX);
            }
        }
    }

    #[test]
    fn test_raw_sample_wraps_assembled_value() {
        let sample = RawSample::from_bytes(0x66, 0x5C);
        assert_eq!(sample.value(), (0x66 << 6) | (0x5C >> 2));
        assert_eq!(u16::from(sample), sample.value());
    }
}
