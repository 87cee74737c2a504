//! Raw-to-physical conversion domain service
//!
//! Both HTU21D measurements use the same linear shape over the 14-bit range:
//! `value = offset + span * raw / 2^14`.

use super::raw::RAW_FULL_SCALE;

/// Linear conversion curve over the 14-bit raw range
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConversionCurve {
    /// Physical value at raw = 0
    pub offset: f32,
    /// Physical span covered by the full raw range
    pub span: f32,
}

impl ConversionCurve {
    /// Relative humidity in %RH (datasheet: RH = -6 + 125 * S / 2^16,
    /// expressed here over the 14-bit sample)
    pub const HUMIDITY: Self = Self {
        offset: -6.0,
        span: 125.0,
    };

    /// Temperature in degrees Celsius (datasheet: T = -46.85 + 175.72 * S / 2^16)
    pub const TEMPERATURE: Self = Self {
        offset: -46.85,
        span: 175.72,
    };

    /// Create a curve with custom parameters
    pub const fn new(offset: f32, span: f32) -> Self {
        Self { offset, span }
    }

    /// Convert a raw sample. Values beyond 14 bits are not clamped.
    #[inline]
    pub fn apply(&self, raw: u16) -> f32 {
        self.offset + self.span * (raw as f32 / RAW_FULL_SCALE)
    }
}

/// Relative humidity as a whole percentage, truncated toward zero
pub fn humidity_percent(raw: u16) -> i16 {
    ConversionCurve::HUMIDITY.apply(raw) as i16
}

/// Temperature in degrees Celsius
pub fn temperature_celsius(raw: u16) -> f32 {
    ConversionCurve::TEMPERATURE.apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::raw::RAW_MAX;
    use float_cmp::approx_eq;

    #[test]
    fn test_humidity_half_scale() {
        // -6 + 125 * 0.5 = 56.5, truncated
        assert_eq!(humidity_percent(8192), 56);
    }

    #[test]
    fn test_humidity_bounds() {
        assert_eq!(humidity_percent(0), -6);
        assert_eq!(humidity_percent(RAW_MAX), 118);
        for raw in 0..=RAW_MAX {
            let rh = humidity_percent(raw);
            assert!((-6..=118).contains(&rh), "raw {} gave {}", raw, rh);
        }
    }

    #[test]
    fn test_humidity_truncates_toward_zero() {
        // -6 + 125 * 786 / 16384 is just below zero
        assert_eq!(humidity_percent(786), 0);
        // -6 + 125 * 655 / 16384 = -1.003...
        assert_eq!(humidity_percent(655), -1);
    }

    #[test]
    fn test_temperature_endpoints() {
        assert!(approx_eq!(f32, temperature_celsius(0), -46.85, epsilon = 0.001));
        assert!(approx_eq!(f32, temperature_celsius(RAW_MAX), 128.86, epsilon = 0.01));
    }

    #[test]
    fn test_temperature_monotonic() {
        let mut previous = temperature_celsius(0);
        for raw in 1..=RAW_MAX {
            let t = temperature_celsius(raw);
            assert!(t > previous, "not increasing at raw {}", raw);
            previous = t;
        }
    }

    #[test]
    fn test_out_of_range_raw_is_not_clamped() {
        let t = temperature_celsius(u16::MAX);
        assert!(t > temperature_celsius(RAW_MAX));
        assert!(humidity_percent(u16::MAX) > 118);
    }

    #[test]
    fn test_custom_curve() {
        let curve = ConversionCurve::new(0.0, 100.0);
        assert!(approx_eq!(f32, curve.apply(4096), 25.0, epsilon = 0.0001));
    }
}
