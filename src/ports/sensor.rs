//! Sensor port - abstraction for reading climate data
//!
//! The monitor reads humidity and temperature without knowing which bus
//! driver or sensor chip is behind it.

use crate::domain::{ClimateReading, Measurement};
use crate::ports::registers::BusError;

/// Error type for sensor operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The bus driver failed (only possible with a bounded poll budget)
    Bus(BusError),
}

impl From<BusError> for SensorError {
    fn from(err: BusError) -> Self {
        SensorError::Bus(err)
    }
}

/// Addressing and timing of the sensor transactions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Command byte that triggers a humidity measurement
    pub humidity_command: u8,
    /// Command byte that triggers a temperature measurement
    pub temperature_command: u8,
    /// Pause after each transaction (milliseconds)
    pub settle_ms: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::HTU21D
    }
}

impl SensorConfig {
    /// HTU21D / SHT21 family, hold-master measurements
    pub const HTU21D: Self = Self {
        address: 0x40,
        humidity_command: 0xE5,
        temperature_command: 0xE3,
        settle_ms: 200,
    };

    /// Address byte with the write direction bit
    pub const fn write_address(&self) -> u8 {
        self.address << 1
    }

    /// Address byte with the read direction bit
    pub const fn read_address(&self) -> u8 {
        (self.address << 1) | 1
    }

    /// Command byte for one measurement
    pub const fn command(&self, measurement: Measurement) -> u8 {
        match measurement {
            Measurement::Humidity => self.humidity_command,
            Measurement::Temperature => self.temperature_command,
        }
    }
}

/// Port for reading climate data
///
/// Calls are blocking and run to completion. Implementations own exactly one
/// bus, so a call never overlaps another transaction.
///
/// # Example Implementation
///
/// ```ignore
/// impl<P: MsspPort, B: PollBudget, D: DelayNs> ClimateSensorPort for Htu21dSensor<P, B, D> {
///     fn read_raw(&mut self, measurement: Measurement) -> Result<u16, SensorError> {
///         let [msb, lsb] = self.transfer(self.config.command(measurement))?;
///         Ok(assemble_raw14(msb, lsb))
///     }
/// }
/// ```
pub trait ClimateSensorPort {
    /// Fetch one raw 14-bit sample
    fn read_raw(&mut self, measurement: Measurement) -> Result<u16, SensorError>;

    /// Run a full cycle: humidity, then temperature
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        let raw_humidity = self.read_raw(Measurement::Humidity)?;
        let raw_temperature = self.read_raw(Measurement::Temperature)?;
        Ok(ClimateReading::from_raw(raw_humidity, raw_temperature))
    }

    /// Last raw sample fetched for a quantity (for diagnostics)
    ///
    /// Returns `None` if the sensor doesn't track raw values.
    fn last_raw(&self, _measurement: Measurement) -> Option<u16> {
        None
    }
}
