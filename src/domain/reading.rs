//! Climate reading domain entity
//!
//! A reading is derived from two raw samples taken in one sensor cycle.
//! It is recomputed every cycle and never cached.

use super::conversion::{humidity_percent, temperature_celsius};

/// Which quantity a sensor transaction fetches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    /// Relative humidity
    Humidity,
    /// Temperature
    Temperature,
}

impl Measurement {
    /// Order in which one full cycle reads the two quantities
    pub const CYCLE: [Measurement; 2] = [Measurement::Humidity, Measurement::Temperature];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Measurement::Humidity => "humidity",
            Measurement::Temperature => "temperature",
        }
    }
}

/// One decoded humidity/temperature pair
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClimateReading {
    /// Relative humidity, whole percent (truncated)
    pub humidity_percent: i16,
    /// Temperature in Celsius
    pub temperature_c: f32,
    /// 14-bit raw humidity sample
    pub raw_humidity: u16,
    /// 14-bit raw temperature sample
    pub raw_temperature: u16,
}

impl ClimateReading {
    /// Decode both raw samples
    pub fn from_raw(raw_humidity: u16, raw_temperature: u16) -> Self {
        Self {
            humidity_percent: humidity_percent(raw_humidity),
            temperature_c: temperature_celsius(raw_temperature),
            raw_humidity,
            raw_temperature,
        }
    }

    /// Raw sample for one quantity
    pub const fn raw(&self, measurement: Measurement) -> u16 {
        match measurement {
            Measurement::Humidity => self.raw_humidity,
            Measurement::Temperature => self.raw_temperature,
        }
    }
}
