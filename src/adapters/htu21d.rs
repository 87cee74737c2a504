//! HTU21D humidity/temperature sensor adapter
//!
//! Implements [`ClimateSensorPort`] on top of [`MsspMaster`] using the
//! sensor's hold-master commands. Each measurement is one fixed
//! transaction:
//!
//! ```text
//! S | addr+W | cmd | Sr | addr+R | MSB (ACK) | LSB (NACK) | P | wait settle_ms
//! ```

use embedded_hal::delay::DelayNs;

use crate::adapters::mssp::MsspMaster;
use crate::domain::{Measurement, RawSample};
use crate::ports::poll::PollBudget;
use crate::ports::registers::{BusError, MsspPort};
use crate::ports::sensor::{ClimateSensorPort, SensorConfig, SensorError};

/// HTU21D on an MSSP bus
pub struct Htu21dSensor<P, B, D> {
    bus: MsspMaster<P, B>,
    delay: D,
    config: SensorConfig,
    last_humidity: Option<u16>,
    last_temperature: Option<u16>,
}

impl<P: MsspPort, B: PollBudget, D: DelayNs> Htu21dSensor<P, B, D> {
    /// Create a sensor adapter with the HTU21D defaults
    pub fn new(bus: MsspMaster<P, B>, delay: D) -> Self {
        Self::with_config(bus, delay, SensorConfig::default())
    }

    pub fn with_config(bus: MsspMaster<P, B>, delay: D, config: SensorConfig) -> Self {
        Self {
            bus,
            delay,
            config,
            last_humidity: None,
            last_temperature: None,
        }
    }

    /// One measurement transaction. Returns the MSB and LSB bytes.
    fn transfer(&mut self, command: u8) -> Result<[u8; 2], BusError> {
        self.bus.start()?;
        self.bus.send(self.config.write_address())?;
        self.bus.send(command)?;
        self.bus.repeated_start()?;
        self.bus.send(self.config.read_address())?;
        let msb = self.bus.receive(true)?;
        let lsb = self.bus.receive(false)?;
        self.bus.stop()?;
        self.delay.delay_ms(self.config.settle_ms);
        Ok([msb, lsb])
    }

    pub fn config(&self) -> SensorConfig {
        self.config
    }

    /// Release the bus driver and the delay
    pub fn release(self) -> (MsspMaster<P, B>, D) {
        (self.bus, self.delay)
    }
}

impl<P: MsspPort, B: PollBudget, D: DelayNs> ClimateSensorPort for Htu21dSensor<P, B, D> {
    fn read_raw(&mut self, measurement: Measurement) -> Result<u16, SensorError> {
        let [msb, lsb] = self.transfer(self.config.command(measurement))?;
        let raw = RawSample::from_bytes(msb, lsb).value();
        debug!(
            "HTU21D {}: msb={=u8:#x} lsb={=u8:#x} raw={=u16}",
            measurement.as_str(),
            msb,
            lsb,
            raw
        );

        match measurement {
            Measurement::Humidity => self.last_humidity = Some(raw),
            Measurement::Temperature => self.last_temperature = Some(raw),
        }
        Ok(raw)
    }

    fn last_raw(&self, measurement: Measurement) -> Option<u16> {
        match measurement {
            Measurement::Humidity => self.last_humidity,
            Measurement::Temperature => self.last_temperature,
        }
    }
}
